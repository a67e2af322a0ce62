//! Interactive REPL for the sysprobe MCP server.
//!
//! Launch with `sysprobe-mcp repl` to enter interactive mode.
//! Every command is sent through the same dispatcher that serves stdio,
//! so `/call` reports exactly what a client would receive.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::{json, Value};
use tokio::runtime::Handle;

use crate::cancel::CancelToken;
use crate::protocol::McpServer;
use crate::types::{Envelope, JsonRpcReply};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server identity and protocol version"),
    ("/tools", "List registered tools"),
    ("/ping", "Ping the server, optionally with a message"),
    ("/call", "Call a tool: /call <name> [json arguments]"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion of commands and tool names.
struct ProbeHelper {
    tool_names: Vec<String>,
}

impl Completer for ProbeHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        if cmd == "/call" && !args.contains(' ') {
            let prefix_start = input.len() - args.len();
            let matches: Vec<Pair> = self
                .tool_names
                .iter()
                .filter(|name| name.starts_with(args))
                .map(|name| Pair {
                    display: name.clone(),
                    replacement: format!("{name} "),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for ProbeHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for ProbeHelper {}
impl Validator for ProbeHelper {}
impl Helper for ProbeHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Routes REPL commands through the protocol handler.
struct ReplSession<'a> {
    server: &'a McpServer,
    runtime: Handle,
    cancel: CancelToken,
    next_id: u64,
}

impl ReplSession<'_> {
    /// Build a request envelope, dispatch it, and return the reply.
    fn request(&mut self, method: &str, params: Option<Value>) -> anyhow::Result<JsonRpcReply> {
        self.next_id += 1;
        let mut request = json!({"jsonrpc": "2.0", "id": self.next_id, "method": method});
        if let Some(params) = params {
            request["params"] = params;
        }
        let envelope: Envelope = serde_json::from_str(&request.to_string())?;

        let reply = self
            .runtime
            .block_on(self.server.handler().handle_envelope(envelope, &self.cancel));
        reply.ok_or_else(|| anyhow::anyhow!("no reply for request {}", self.next_id))
    }
}

/// Run the interactive REPL. Blocks the calling thread; `runtime` drives the
/// async handlers.
pub fn run(server: &McpServer, runtime: Handle) -> anyhow::Result<()> {
    let info = server.handler().server_info();
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1m{} v{}\x1b[0m \x1b[90m: host metrics over MCP\x1b[0m",
        info.name, info.version
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let tool_names = server
        .handler()
        .registry()
        .definitions()
        .into_iter()
        .map(|definition| definition.name)
        .collect();

    let mut rl: Editor<ProbeHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(ProbeHelper { tool_names }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".sysprobe_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut session = ReplSession {
        server,
        runtime,
        cancel: CancelToken::new(),
        next_id: 0,
    };
    let prompt = " \x1b[36mprobe>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
                let args = args.trim();

                let result = match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => {
                        cmd_help();
                        Ok(())
                    }
                    "clear" | "cls" => {
                        eprint!("\x1b[2J\x1b[H");
                        Ok(())
                    }
                    "info" => cmd_info(&mut session),
                    "tools" => cmd_tools(&mut session),
                    "ping" => cmd_ping(&mut session, args),
                    "call" => cmd_call(&mut session, args),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                        Ok(())
                    }
                };

                if let Err(e) = result {
                    eprintln!("  Error: {e}");
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands and tool names after /call.");
    eprintln!();
}

/// Print the result, or the error object, of a reply.
fn print_reply(reply: &JsonRpcReply) -> anyhow::Result<()> {
    match reply {
        JsonRpcReply::Success(response) => {
            eprintln!("{}", serde_json::to_string_pretty(&response.result)?);
        }
        JsonRpcReply::Failure(failure) => {
            eprintln!(
                "  \x1b[31merror {}\x1b[0m {}",
                failure.error.code, failure.error.message
            );
        }
    }
    Ok(())
}

fn cmd_info(session: &mut ReplSession<'_>) -> anyhow::Result<()> {
    let reply = session.request("initialize", None)?;
    let JsonRpcReply::Success(response) = &reply else {
        return print_reply(&reply);
    };
    let result = &response.result;
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        result["serverInfo"]["name"].as_str().unwrap_or("?"),
        result["serverInfo"]["version"].as_str().unwrap_or("?")
    );
    eprintln!(
        "  Protocol: {}",
        result["protocolVersion"].as_str().unwrap_or("?")
    );
    eprintln!("  Tools:    {}", session.server.handler().registry().len());
    eprintln!();
    Ok(())
}

fn cmd_tools(session: &mut ReplSession<'_>) -> anyhow::Result<()> {
    let reply = session.request("tools/list", None)?;
    let JsonRpcReply::Success(response) = &reply else {
        return print_reply(&reply);
    };
    let tools = response.result["tools"].as_array().cloned().unwrap_or_default();
    eprintln!();
    eprintln!("  {} tools registered:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!(
            "    {:<20} {}",
            tool["name"].as_str().unwrap_or(""),
            tool["description"].as_str().unwrap_or("")
        );
    }
    eprintln!();
    Ok(())
}

fn cmd_ping(session: &mut ReplSession<'_>, args: &str) -> anyhow::Result<()> {
    let params = (!args.is_empty()).then(|| json!({ "message": args }));
    let reply = session.request("ping", params)?;
    print_reply(&reply)
}

fn cmd_call(session: &mut ReplSession<'_>, args: &str) -> anyhow::Result<()> {
    let (name, arguments) = args.split_once(' ').unwrap_or((args, ""));
    if name.is_empty() {
        eprintln!("  Usage: /call <tool> [json arguments]");
        return Ok(());
    }

    let mut params = json!({ "name": name });
    let arguments = arguments.trim();
    if !arguments.is_empty() {
        let arguments: Value = serde_json::from_str(arguments)
            .map_err(|e| anyhow::anyhow!("arguments are not valid JSON: {e}"))?;
        params["arguments"] = arguments;
    }

    let reply = session.request("tools/call", Some(params))?;
    match &reply {
        JsonRpcReply::Success(response) => {
            let content = response.result["content"].as_array().cloned().unwrap_or_default();
            if content.is_empty() {
                eprintln!("  \x1b[90m(no content)\x1b[0m");
            }
            for item in content {
                match item["text"].as_str() {
                    Some(text) => eprintln!("  {text}"),
                    None => eprintln!("  {item}"),
                }
            }
            Ok(())
        }
        JsonRpcReply::Failure(_) => print_reply(&reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_tools;

    fn helper() -> ProbeHelper {
        ProbeHelper {
            tool_names: vec!["cpu_status".into(), "echo".into(), "uptime".into()],
        }
    }

    #[test]
    fn test_command_completion() {
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (start, matches) = helper().complete("/to", 3, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].replacement, "/tools ");
    }

    #[test]
    fn test_tool_name_completion() {
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (start, matches) = helper().complete("/call ec", 8, &ctx).unwrap();
        assert_eq!(start, 6);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].replacement, "echo ");
    }

    #[test]
    fn test_session_routes_through_handler() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let server = McpServer::builder().tools(default_tools()).build().unwrap();
        let mut session = ReplSession {
            server: &server,
            runtime: runtime.handle().clone(),
            cancel: CancelToken::new(),
            next_id: 0,
        };

        let reply = session
            .request("tools/call", Some(json!({"name": "echo", "arguments": {"message": "hi"}})))
            .unwrap();
        let JsonRpcReply::Success(response) = reply else {
            panic!("expected success");
        };
        assert_eq!(response.result["content"][0]["text"], "hi");
        assert_eq!(session.next_id, 1);

        let reply = session.request("tools/call", Some(json!({"name": "nope"}))).unwrap();
        assert_eq!(reply.error().unwrap().code, -32001);
    }
}
