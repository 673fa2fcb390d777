//! MCP plugin and tool registry.
//!
//! Plugins and their tools carry independent enabled flags. A tool is only
//! effective when both its own flag and its parent plugin's flag are set;
//! disabling a plugin leaves the per-tool flags untouched so they resume
//! when the plugin is re-enabled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpTool {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpPlugin {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub tools: Vec<McpTool>,
}

impl McpPlugin {
    /// Ids of this plugin's individually enabled tools. Does not consider
    /// the plugin-level flag; callers gate on that separately.
    pub fn enabled_tool_ids(&self) -> Vec<String> {
        self.tools
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.id.clone())
            .collect()
    }
}

/// The session's plugin set. Toggles are pure local state flips; nothing
/// here talks to the network.
#[derive(Debug, Clone)]
pub struct PluginSet {
    plugins: Vec<McpPlugin>,
}

impl Default for PluginSet {
    fn default() -> Self {
        Self {
            plugins: default_catalog(),
        }
    }
}

impl PluginSet {
    pub fn new(plugins: Vec<McpPlugin>) -> Self {
        Self { plugins }
    }

    pub fn plugins(&self) -> &[McpPlugin] {
        &self.plugins
    }

    pub fn get(&self, plugin_id: &str) -> Option<&McpPlugin> {
        self.plugins.iter().find(|p| p.id == plugin_id)
    }

    /// Flip a plugin's enabled flag. Unknown ids are ignored.
    pub fn toggle_plugin(&mut self, plugin_id: &str) {
        if let Some(plugin) = self.plugins.iter_mut().find(|p| p.id == plugin_id) {
            plugin.enabled = !plugin.enabled;
        }
    }

    /// Flip a tool's enabled flag. Unknown plugin or tool ids are ignored.
    pub fn toggle_tool(&mut self, plugin_id: &str, tool_id: &str) {
        if let Some(plugin) = self.plugins.iter_mut().find(|p| p.id == plugin_id) {
            if let Some(tool) = plugin.tools.iter_mut().find(|t| t.id == tool_id) {
                tool.enabled = !tool.enabled;
            }
        }
    }

    /// Effective enablement: plugin flag AND tool flag.
    pub fn is_tool_active(&self, plugin_id: &str, tool_id: &str) -> bool {
        self.get(plugin_id).is_some_and(|p| {
            p.enabled && p.tools.iter().any(|t| t.id == tool_id && t.enabled)
        })
    }

    /// Ids of enabled plugins, in catalog order.
    pub fn enabled_plugin_ids(&self) -> Vec<String> {
        self.plugins
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Enabled plugin id -> ids of its enabled tools. Enabled plugins with
    /// zero enabled tools still appear, with an empty list.
    pub fn enabled_tools(&self) -> HashMap<String, Vec<String>> {
        self.plugins
            .iter()
            .filter(|p| p.enabled)
            .map(|p| (p.id.clone(), p.enabled_tool_ids()))
            .collect()
    }
}

fn tool(id: &str, name: &str, enabled: bool) -> McpTool {
    McpTool {
        id: id.into(),
        name: name.into(),
        enabled,
    }
}

/// The built-in plugin catalog. All plugins start disabled; most tools
/// start enabled so enabling a plugin is one click.
pub fn default_catalog() -> Vec<McpPlugin> {
    vec![
        McpPlugin {
            id: "notion".into(),
            name: "Notion".into(),
            enabled: false,
            tools: vec![
                tool("search_pages", "Search Pages", true),
                tool("get_page", "Get Page", true),
                tool("create_page", "Create Page", true),
                tool("update_page", "Update Page", true),
            ],
        },
        McpPlugin {
            id: "gmail".into(),
            name: "Gmail".into(),
            enabled: false,
            tools: vec![
                tool("read_email", "Read Email", true),
                tool("send_email", "Send Email", true),
                tool("search_emails", "Search Emails", true),
                tool("filter_emails", "Filter Emails", true),
            ],
        },
        McpPlugin {
            id: "google-calendar".into(),
            name: "Google Calendar".into(),
            enabled: false,
            tools: vec![
                tool("list_events", "List Events", true),
                tool("get_event", "Get Event", true),
                tool("create_event", "Create Event", true),
                tool("update_event", "Update Event", true),
                tool("delete_event", "Delete Event", true),
            ],
        },
        McpPlugin {
            id: "n8n".into(),
            name: "n8n".into(),
            enabled: false,
            tools: vec![
                tool("trigger_workflow", "Trigger Workflow", true),
                tool("list_workflows", "List Workflows", true),
                tool("get_execution", "Get Execution", false),
            ],
        },
    ]
}
