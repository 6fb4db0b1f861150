use std::collections::HashMap;
use std::time::Duration;

use crate::Result;

// ─── ExecOptions ──────────────────────────────────────────────────────────

/// Options for driving a Copilot CLI subprocess execution.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Model name forwarded as `--model` (e.g. `"gpt-5-mini"`).
    pub model: String,
    /// Agent profile name forwarded as `--agent` (e.g. `"planner"`).
    pub agent_name: Option<String>,
    /// MCP servers registered for this execution.
    pub mcp_servers: Vec<McpServerConfig>,
    /// Working directory for the subprocess.
    pub cwd: Option<std::path::PathBuf>,
    /// Additional environment variables for the subprocess.
    pub env: HashMap<String, String>,
    /// Wall-clock budget for the whole execution, in whole minutes.
    pub timeout_minutes: u64,
    /// Custom path to the `copilot` binary (default: `"copilot"`).
    pub path_to_executable: Option<String>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            model: "gpt-5-mini".to_string(),
            agent_name: None,
            mcp_servers: Vec::new(),
            cwd: None,
            env: HashMap::new(),
            timeout_minutes: 5,
            path_to_executable: None,
        }
    }
}

impl ExecOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes * 60)
    }
}

// ─── McpServerConfig ──────────────────────────────────────────────────────

/// MCP server configuration for stdio transport.
///
/// Serialised verbatim into the `--additional-mcp-config` argument; the
/// gateway never interprets the server's own schema.
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Logical name for this server (key under `mcpServers`).
    pub name: String,
    /// Executable to spawn.
    pub command: String,
    /// Arguments for the executable.
    pub args: Vec<String>,
    /// Additional environment variables for the server process.
    pub env: HashMap<String, String>,
}

/// Serialise `McpServerConfig` entries into the JSON string expected by
/// `copilot --additional-mcp-config '...'`.
///
/// Format: `{"mcpServers":{"<name>":{"type":"stdio","tools":["*"],"command":"...","args":[...],"env":{...}}}}`
pub fn build_mcp_config_json(servers: &[McpServerConfig]) -> Result<String> {
    let mut mcp_servers = serde_json::Map::new();

    for srv in servers {
        let mut cfg = serde_json::Map::new();
        cfg.insert("type".into(), serde_json::Value::String("stdio".into()));
        cfg.insert(
            "tools".into(),
            serde_json::Value::Array(vec![serde_json::Value::String("*".into())]),
        );
        cfg.insert(
            "command".into(),
            serde_json::Value::String(srv.command.clone()),
        );

        if !srv.args.is_empty() {
            cfg.insert(
                "args".into(),
                serde_json::Value::Array(
                    srv.args
                        .iter()
                        .map(|a| serde_json::Value::String(a.clone()))
                        .collect(),
                ),
            );
        }

        if !srv.env.is_empty() {
            let env: serde_json::Map<String, serde_json::Value> = srv
                .env
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            cfg.insert("env".into(), serde_json::Value::Object(env));
        }

        mcp_servers.insert(srv.name.clone(), serde_json::Value::Object(cfg));
    }

    Ok(serde_json::json!({ "mcpServers": mcp_servers }).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcp_config_json_nests_servers_by_name() {
        let servers = vec![
            McpServerConfig {
                name: "filesystem".into(),
                command: "npx".into(),
                args: vec![
                    "-y".into(),
                    "@modelcontextprotocol/server-filesystem".into(),
                    "/work".into(),
                ],
                env: HashMap::new(),
            },
            McpServerConfig {
                name: "azure-devops".into(),
                command: "npx".into(),
                args: vec!["-y".into(), "@azure-devops/mcp".into(), "myorg".into()],
                env: HashMap::from([("ADO_MCP_AUTH_TOKEN".into(), "secret".into())]),
            },
        ];

        let json = build_mcp_config_json(&servers).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();

        let fs = &v["mcpServers"]["filesystem"];
        assert_eq!(fs["type"], "stdio");
        assert_eq!(fs["command"], "npx");
        assert_eq!(fs["tools"][0], "*");
        assert_eq!(fs["args"][2], "/work");
        // No env key when the map is empty
        assert!(fs.get("env").is_none());

        let ado = &v["mcpServers"]["azure-devops"];
        assert_eq!(ado["env"]["ADO_MCP_AUTH_TOKEN"], "secret");
    }

    #[test]
    fn exec_options_timeout_is_whole_minutes() {
        let opts = ExecOptions {
            timeout_minutes: 30,
            ..Default::default()
        };
        assert_eq!(opts.timeout(), Duration::from_secs(1800));
    }
}
