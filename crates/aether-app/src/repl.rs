//! Interactive terminal loop over the chat session.
//!
//! Plain lines are sent as chat messages; `/`-prefixed lines are commands.
//! All conversation state lives in `ChatSession`; this module only renders
//! it and translates commands into session calls.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use aether_client::{
    ApiConfig, Attachment, AttachmentKind, AuthSession, ChatSession, HttpBackend, Role,
    CHAT_MODELS,
};
use aether_config::CredentialStore;

const HELP: &str = "\
Commands:
  /new                       start a new conversation
  /list                      list conversations (most recent first)
  /load <n|id>               switch to a conversation by list index or id
  /upload <path>             upload a file (documents enable retrieval)
  /models                    list selectable models
  /model <id>                switch model
  /rag | /web | /imagegen    toggle retrieval / web search / image generation
  /plugins                   show plugin and tool state
  /mcp <plugin>              toggle a plugin
  /tool <plugin> <tool>      toggle a tool within a plugin
  /login <email> <password>  log in
  /signup <name> <email> <password>
  /logout                    log out and forget stored credentials
  /whoami                    show the logged-in user
  /quit                      exit";

pub struct App {
    api: ApiConfig,
    auth: AuthSession,
    session: ChatSession,
    model: String,
    /// Uploaded images waiting to be attached to the next message.
    pending_attachments: Vec<Attachment>,
}

impl App {
    pub fn new(api: ApiConfig, store: Option<CredentialStore>, model: String) -> Self {
        // Login/signup never carry a token, so the auth session keeps a
        // plain backend for the whole run.
        let auth_backend = Arc::new(HttpBackend::new(api.clone()));
        let auth = match store {
            Some(store) => AuthSession::new(auth_backend).with_store(store),
            None => AuthSession::new(auth_backend),
        };

        let token = auth.user().map(|u| u.token.clone());
        let session = build_session(&api, token, &model);

        Self {
            api,
            auth,
            session,
            model,
            pending_attachments: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        match self.auth.user() {
            Some(user) => println!("Logged in as {}.", user.email),
            None => println!("Not logged in. Use /login or /signup."),
        }
        println!("Type a message to chat, /help for commands.\n");

        if self.auth.is_authenticated() {
            self.session.refresh_conversations().await;
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command) = line.strip_prefix('/') {
                if self.handle_command(command).await {
                    break;
                }
            } else {
                self.send(line).await;
            }
        }
        Ok(())
    }

    /// Returns true when the loop should exit.
    async fn handle_command(&mut self, command: &str) -> bool {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match (name, args.as_slice()) {
            ("help", _) => println!("{HELP}"),
            ("quit" | "exit", _) => return true,

            ("new", _) => {
                self.session.create_new_conversation();
                self.pending_attachments.clear();
                println!("Started a new conversation.");
            }
            ("list", _) => self.list_conversations().await,
            ("load", [target]) => self.load_conversation(target).await,

            ("upload", [path]) => self.upload(path).await,

            ("models", _) => {
                let selected = self.session.selected_model();
                for model in CHAT_MODELS {
                    let marker = if model.id == selected { "*" } else { " " };
                    match model.description {
                        Some(desc) => println!("{marker} {} ({}) - {desc}", model.label, model.id),
                        None => println!("{marker} {} ({})", model.label, model.id),
                    }
                }
            }
            ("model", [id]) => match aether_client::models::find_model(id) {
                Some(model) => {
                    self.session.set_selected_model(model.id);
                    println!("Model set to {}.", model.label);
                }
                None => println!("Unknown model: {id} (see /models)"),
            },

            ("rag", _) => {
                let value = !self.session.use_rag();
                self.session.set_use_rag(value);
                println!("Retrieval {}.", on_off(value));
            }
            ("web", _) => {
                let value = !self.session.web_search_enabled();
                self.session.set_web_search_enabled(value);
                println!("Web search {}.", on_off(value));
            }
            ("imagegen", _) => {
                let value = !self.session.image_gen_enabled();
                self.session.set_image_gen_enabled(value);
                println!("Image generation {}.", on_off(value));
            }

            ("plugins", _) => {
                for plugin in self.session.plugins() {
                    println!("[{}] {}", on_off(plugin.enabled), plugin.name);
                    for tool in &plugin.tools {
                        println!("    [{}] {}", on_off(tool.enabled), tool.id);
                    }
                }
            }
            ("mcp", [plugin_id]) => self.session.toggle_mcp(plugin_id),
            ("tool", [plugin_id, tool_id]) => self.session.toggle_tool(plugin_id, tool_id),

            ("login", [email, password]) => match self.auth.login(email, password).await {
                Ok(user) => {
                    println!("Logged in as {}.", user.email);
                    self.rebuild_session().await;
                }
                Err(e) => println!("{e}"),
            },
            ("signup", [name, email, password]) => {
                match self.auth.signup(name, email, password, password).await {
                    Ok(user) => {
                        println!("Account created for {}.", user.email);
                        self.rebuild_session().await;
                    }
                    Err(e) => println!("{e}"),
                }
            }
            ("logout", _) => {
                self.auth.logout();
                self.rebuild_session().await;
                println!("Logged out.");
            }
            ("whoami", _) => match self.auth.user() {
                Some(user) => println!(
                    "{} <{}>",
                    user.name.as_deref().unwrap_or("(no name)"),
                    user.email
                ),
                None => println!("Not logged in."),
            },

            _ => println!("Unknown command: /{command} (see /help)"),
        }
        false
    }

    async fn send(&mut self, content: &str) {
        let attachments = std::mem::take(&mut self.pending_attachments);
        self.session.send_message(content, attachments).await;

        let messages = self.session.messages();
        let Some(last) = messages.last() else { return };
        if last.role != Role::Assistant {
            return;
        }

        println!("\n{}\n", last.content);
        for source in &last.sources {
            println!("  source: {} ({})", source.title, source.url);
        }
        if !last.tools_used.is_empty() {
            println!("  tools: {}", last.tools_used.join(", "));
        }
        if let Some(url) = &last.image_url {
            println!("  image: {url}");
        }
    }

    async fn list_conversations(&self) {
        self.session.refresh_conversations().await;
        let summaries = self.session.conversations();
        if summaries.is_empty() {
            println!("No conversations yet.");
            return;
        }
        for (i, summary) in summaries.iter().enumerate() {
            println!(
                "{:>3}. {} ({}) [{}]",
                i + 1,
                summary.title,
                summary.date.format("%Y-%m-%d %H:%M"),
                summary.id
            );
        }
    }

    /// `target` is a 1-based index into the last `/list` output, or a raw
    /// conversation id.
    async fn load_conversation(&mut self, target: &str) {
        let id = match target.parse::<usize>() {
            Ok(n) => {
                let summaries = self.session.conversations();
                match n.checked_sub(1).and_then(|i| summaries.get(i)) {
                    Some(summary) => summary.id.to_string(),
                    None => {
                        println!("No conversation at index {n} (see /list).");
                        return;
                    }
                }
            }
            Err(_) => target.to_string(),
        };

        self.session.load_conversation(&id).await;
        self.pending_attachments.clear();

        let messages = self.session.messages();
        println!("Loaded conversation {id} ({} messages).", messages.len());
        for message in &messages {
            let speaker = match message.role {
                Role::User => "you",
                Role::Assistant => "assistant",
            };
            println!("{speaker}: {}", message.content);
        }
    }

    async fn upload(&mut self, path: &str) {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                println!("Cannot read {path}: {e}");
                return;
            }
        };
        let filename = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        match self.session.upload_document(&filename, bytes).await {
            Ok(result) => match result.kind {
                AttachmentKind::Image => {
                    let mime = mime_guess::from_path(&filename)
                        .first()
                        .map(|m| m.to_string());
                    self.pending_attachments.push(Attachment {
                        kind: AttachmentKind::Image,
                        url: result.data.unwrap_or_default(),
                        name: result.filename.clone(),
                        mime_type: mime,
                    });
                    println!("Image {} will be attached to your next message.", result.filename);
                }
                AttachmentKind::File => {
                    println!("Uploaded {}; retrieval enabled for this conversation.", result.filename);
                }
            },
            Err(e) => println!("{e}"),
        }
    }

    /// Swap the session backend after an auth change. The token lives in the
    /// HTTP layer, so the session is rebuilt around a fresh one.
    async fn rebuild_session(&mut self) {
        let token = self.auth.user().map(|u| u.token.clone());
        self.session = build_session(&self.api, token, &self.model);
        self.pending_attachments.clear();
        if self.auth.is_authenticated() {
            self.session.refresh_conversations().await;
        }
    }
}

fn build_session(api: &ApiConfig, token: Option<String>, model: &str) -> ChatSession {
    let mut config = api.clone();
    config.token = token;
    ChatSession::new(Arc::new(HttpBackend::new(config))).with_model(model)
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
