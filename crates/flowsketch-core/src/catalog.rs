//! Known n8n node types and the label-to-type matcher.
//!
//! The model labels nodes with whatever the diagram says ("chat trigger",
//! "research agent", "api call"). The catalog maps those labels onto the
//! fixed vocabulary of node types the automation platform actually ships,
//! with a deterministic ranked-rule matcher instead of iteration-order
//! precedence.

use serde_json::{json, Map, Value};

/// Type tag used when nothing in the catalog matches.
pub const FALLBACK_KIND: &str = "n8n-nodes-base.function";

/// Broad grouping of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    Trigger,
    Ai,
    Data,
    Http,
    Conditional,
    Response,
}

/// One known node type.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    /// Canonical type tag, e.g. `n8n-nodes-base.webhook`.
    pub kind: String,

    /// Display name.
    pub name: String,

    pub category: NodeCategory,

    pub description: String,

    /// Default parameter bag for a freshly corrected node.
    pub parameters: Map<String, Value>,

    /// Phrases a diagram commonly uses for this node.
    pub aliases: Vec<String>,
}

/// The static table of known node types.
#[derive(Debug, Clone)]
pub struct NodeCatalog {
    entries: Vec<NodeSpec>,
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeCatalog {
    pub fn new() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    pub fn entries(&self) -> &[NodeSpec] {
        &self.entries
    }

    /// Look up an entry by its canonical type tag.
    pub fn get(&self, kind: &str) -> Option<&NodeSpec> {
        self.entries.iter().find(|spec| spec.kind == kind)
    }

    /// Whether a type tag names a known entry.
    pub fn knows(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Find the best entry for a free-text label or type tag.
    ///
    /// Rules run in rank order across the whole table, so an exact alias
    /// anywhere beats a substring match earlier in the table:
    /// 1. alias or display name equals the term;
    /// 2. term contained in an alias or display name, or vice versa;
    /// 3. term contained in the description.
    /// Matching is case-insensitive; the first hit wins.
    pub fn resolve(&self, term: &str) -> Option<&NodeSpec> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }

        type Rule = fn(&NodeSpec, &str) -> bool;
        const RULES: [Rule; 3] = [exact_rule, containment_rule, description_rule];

        RULES
            .iter()
            .find_map(|rule| self.entries.iter().find(|&spec| rule(spec, &term)))
    }

    /// Total lookup: the fallback entry when nothing matches.
    pub fn resolve_or(&self, term: &str, fallback_kind: &str) -> &NodeSpec {
        self.resolve(term)
            .or_else(|| self.get(fallback_kind))
            .unwrap_or(&self.entries[0])
    }

    /// Total lookup against [`FALLBACK_KIND`].
    pub fn resolve_or_default(&self, term: &str) -> &NodeSpec {
        self.resolve_or(term, FALLBACK_KIND)
    }

    /// The entry behind [`FALLBACK_KIND`].
    pub fn fallback(&self) -> &NodeSpec {
        self.get(FALLBACK_KIND).unwrap_or(&self.entries[0])
    }
}

fn exact_rule(spec: &NodeSpec, term: &str) -> bool {
    spec.name.to_lowercase() == term || spec.aliases.iter().any(|alias| alias == term)
}

fn containment_rule(spec: &NodeSpec, term: &str) -> bool {
    let name = spec.name.to_lowercase();
    name.contains(term)
        || term.contains(&name)
        || spec
            .aliases
            .iter()
            .any(|alias| alias.contains(term) || term.contains(alias.as_str()))
}

fn description_rule(spec: &NodeSpec, term: &str) -> bool {
    spec.description.to_lowercase().contains(term)
}

fn spec(
    kind: &str,
    name: &str,
    category: NodeCategory,
    description: &str,
    parameters: Value,
    aliases: &[&str],
) -> NodeSpec {
    let Value::Object(parameters) = parameters else {
        unreachable!("catalog parameter bags are object literals");
    };
    NodeSpec {
        kind: kind.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        parameters,
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

fn builtin_entries() -> Vec<NodeSpec> {
    vec![
        spec(
            "n8n-nodes-base.webhook",
            "Webhook",
            NodeCategory::Trigger,
            "Receives HTTP requests",
            json!({
                "path": "webhook-path",
                "responseMode": "lastNode",
                "httpMethod": "POST"
            }),
            &["webhook", "http trigger", "api endpoint", "when message received", "chat trigger"],
        ),
        spec(
            "n8n-nodes-base.manualTrigger",
            "Manual Trigger",
            NodeCategory::Trigger,
            "Manually trigger workflow",
            json!({}),
            &["manual", "start", "begin", "trigger"],
        ),
        spec(
            "n8n-nodes-base.openAi",
            "OpenAI",
            NodeCategory::Ai,
            "OpenAI GPT models",
            json!({
                "operation": "text",
                "model": "gpt-4",
                "prompt": "={{ $json.input }}",
                "temperature": 0.7,
                "maxTokens": 1000
            }),
            &["openai", "gpt", "chat model", "ai model", "language model", "llm", "openai chat model"],
        ),
        spec(
            "n8n-nodes-base.function",
            "Function",
            NodeCategory::Data,
            "Execute JavaScript code for agent-like behavior",
            json!({
                "functionCode": "// transform incoming items\nreturn items;"
            }),
            &["agent", "ai agent", "tools agent", "research agent", "scriptwriting agent", "function", "code"],
        ),
        spec(
            "n8n-nodes-base.httpRequest",
            "HTTP Request",
            NodeCategory::Http,
            "Make HTTP requests",
            json!({
                "method": "POST",
                "url": "",
                "authentication": "none",
                "sendHeaders": true,
                "headerParameters": {"parameters": []},
                "sendBody": true,
                "contentType": "json",
                "jsonBody": "={{ $json }}"
            }),
            &["http", "api call", "request", "post", "get", "webhook call", "api request"],
        ),
        spec(
            "n8n-nodes-base.set",
            "Set",
            NodeCategory::Data,
            "Set data values",
            json!({
                "keepOnlySet": false,
                "values": {"string": [], "number": [], "boolean": []}
            }),
            &["set", "data", "variable", "value", "assign"],
        ),
        spec(
            "n8n-nodes-base.respondToWebhook",
            "Respond to Webhook",
            NodeCategory::Response,
            "Send response to webhook",
            json!({
                "responseMode": "lastNode",
                "responseData": "={{ $json }}"
            }),
            &["respond", "response", "reply", "answer", "return"],
        ),
        spec(
            "n8n-nodes-base.if",
            "IF",
            NodeCategory::Conditional,
            "Conditional logic",
            json!({
                "conditions": {"string": [], "number": [], "boolean": []}
            }),
            &["if", "condition", "conditional", "logic", "decision"],
        ),
    ]
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
