//! The canonical generation prompt.
//!
//! One template, parameterized by project name, workflow category and the
//! optional free-text fields, replaces the near-duplicate prompt copies
//! the widget accumulated.

use std::fmt;

/// Workflow category, steering the default description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkflowCategory {
    #[default]
    General,
    Customer,
    Inventory,
    Training,
    Reporting,
}

impl WorkflowCategory {
    pub const ALL: [WorkflowCategory; 5] = [
        WorkflowCategory::General,
        WorkflowCategory::Customer,
        WorkflowCategory::Inventory,
        WorkflowCategory::Training,
        WorkflowCategory::Reporting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WorkflowCategory::General => "general",
            WorkflowCategory::Customer => "customer",
            WorkflowCategory::Inventory => "inventory",
            WorkflowCategory::Training => "training",
            WorkflowCategory::Reporting => "reporting",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.name() == name.trim().to_lowercase())
    }

    /// Description used when the caller provides none.
    pub fn default_description(&self) -> &'static str {
        match self {
            WorkflowCategory::General => {
                "Convert this N8N workflow diagram to a working JSON configuration with proper error handling"
            }
            WorkflowCategory::Customer => {
                "Create an N8N workflow for customer communication automation with email notifications and CRM integration"
            }
            WorkflowCategory::Inventory => {
                "Generate an N8N workflow for inventory management with stock alerts and supplier notifications"
            }
            WorkflowCategory::Training => {
                "Build an N8N workflow for training content automation and learner progress tracking"
            }
            WorkflowCategory::Reporting => {
                "Create an N8N workflow for automated reporting with data collection and dashboard updates"
            }
        }
    }
}

impl fmt::Display for WorkflowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the prompt template is parameterized by.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub project_name: String,
    pub category: WorkflowCategory,
    pub description: Option<String>,
    pub transcript: Option<String>,
}

impl PromptOptions {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    fn effective_description(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| self.category.default_description())
    }
}

/// Render the generation prompt. The image rides in a separate content
/// block; this is the text part of the user message.
pub fn render(options: &PromptOptions) -> String {
    let mut prompt = format!(
        r#"CRITICAL: Analyze this workflow diagram and create ACCURATE N8N JSON with proper AI node types.

VISUAL ANALYSIS:
1. READ all visible text labels exactly
2. IDENTIFY AI agents and their connected models
3. MAP all connections precisely including parallel flows
4. USE CORRECT N8N node types for AI components

CORRECT N8N NODE TYPES FOR AI:
- AI Agents/Tools: "n8n-nodes-base.aiAgent" or "n8n-nodes-base.agent"
- OpenAI Models: "n8n-nodes-base.openAi"
- LLM Chains: "n8n-nodes-base.chainLlm"
- Chat Models: "n8n-nodes-base.chatOpenAi"
- Webhooks: "n8n-nodes-base.webhook"
- HTTP Requests: "n8n-nodes-base.httpRequest"

REQUIRED JSON STRUCTURE:
{{
  "nodes": [
    {{
      "id": "chatTrigger",
      "type": "n8n-nodes-base.webhook",
      "name": "When chat message received",
      "position": [100, 100],
      "parameters": {{
        "path": "chat-webhook",
        "responseMode": "lastNode"
      }}
    }},
    {{
      "id": "researchAgent",
      "type": "n8n-nodes-base.aiAgent",
      "name": "Research Agent",
      "position": [300, 100],
      "parameters": {{
        "agentType": "tools",
        "systemMessage": "You are a research agent",
        "modelName": "gpt-4"
      }}
    }}
  ],
  "connections": {{
    "chatTrigger": {{
      "main": [
        [
          {{
            "node": "researchAgent",
            "type": "main",
            "index": 0
          }}
        ]
      ]
    }}
  }}
}}

CRITICAL REQUIREMENTS:
- Use PROPER N8N AI node types (aiAgent, chatOpenAi)
- Include REALISTIC parameters for each node type
- Map EXACT URLs visible in the image
- Create PARALLEL connections where shown
- Use actual API endpoints and authentication methods

PROJECT: {project}
GOAL: {description}
"#,
        project = options.project_name,
        description = options.effective_description(),
    );

    if let Some(transcript) = options
        .transcript
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        prompt.push_str("\nVIDEO TRANSCRIPT (additional context for node naming and flow):\n");
        prompt.push_str(transcript);
        prompt.push('\n');
    }

    prompt.push_str("\nOUTPUT ONLY COMPLETE, REALISTIC N8N JSON:");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_roundtrip() {
        for category in WorkflowCategory::ALL {
            assert_eq!(WorkflowCategory::from_name(category.name()), Some(category));
        }
        assert_eq!(WorkflowCategory::from_name("TRAINING "), Some(WorkflowCategory::Training));
        assert_eq!(WorkflowCategory::from_name("unknown"), None);
    }

    #[test]
    fn test_prompt_carries_project_name() {
        let options = PromptOptions::new("Acme Pipeline");
        let prompt = render(&options);
        assert!(prompt.contains("PROJECT: Acme Pipeline"));
        assert!(prompt.ends_with("OUTPUT ONLY COMPLETE, REALISTIC N8N JSON:"));
    }

    #[test]
    fn test_category_default_description_is_used() {
        let options = PromptOptions {
            project_name: "p".into(),
            category: WorkflowCategory::Inventory,
            description: None,
            transcript: None,
        };
        let prompt = render(&options);
        assert!(prompt.contains("inventory management with stock alerts"));
    }

    #[test]
    fn test_explicit_description_wins_over_category() {
        let options = PromptOptions {
            project_name: "p".into(),
            category: WorkflowCategory::Inventory,
            description: Some("Route support emails to the right queue".into()),
            transcript: None,
        };
        let prompt = render(&options);
        assert!(prompt.contains("Route support emails"));
        assert!(!prompt.contains("stock alerts"));
    }

    #[test]
    fn test_blank_description_falls_back() {
        let options = PromptOptions {
            project_name: "p".into(),
            category: WorkflowCategory::General,
            description: Some("   ".into()),
            transcript: None,
        };
        let prompt = render(&options);
        assert!(prompt.contains("working JSON configuration"));
    }

    #[test]
    fn test_transcript_section_is_optional() {
        let without = render(&PromptOptions::new("p"));
        assert!(!without.contains("VIDEO TRANSCRIPT"));

        let with = render(&PromptOptions {
            project_name: "p".into(),
            category: WorkflowCategory::General,
            description: None,
            transcript: Some("First we fetch the leads, then we score them.".into()),
        });
        assert!(with.contains("VIDEO TRANSCRIPT"));
        assert!(with.contains("score them"));
        // The output instruction stays last.
        assert!(with.ends_with("OUTPUT ONLY COMPLETE, REALISTIC N8N JSON:"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let options = PromptOptions::new("Same");
        assert_eq!(render(&options), render(&options));
    }
}
