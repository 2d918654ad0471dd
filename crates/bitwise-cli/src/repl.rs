//! Interactive scratchpad: every input line is appended to the session document and the
//! whole document is re-evaluated. Lines starting with `:` are commands.

use bitwise_lang::{AngleMode, MemSessionStore, Session, SessionStore};

/// What the caller should do after a line was handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Nothing,
    Quit,
}

pub const HELP: &str = "\
:vars               list variables
:mode [deg|rad]     set the angle mode, or toggle it
:precision <0-10>   set displayed decimal places
:save <name>        save the document
:sessions           list saved documents
:open <id>          replace the document with a saved one
:delete <id>        delete a saved document
:clear              start over
:quit               exit";

pub struct Repl<S: SessionStore = MemSessionStore> {
    session: Session,
    store: S,
    lines: usize,
}

impl Repl<MemSessionStore> {
    pub fn new(mode: AngleMode, precision: u8) -> Self {
        Self::with_store(Session::new(mode, precision), MemSessionStore::new())
    }
}

impl<S: SessionStore> Repl<S> {
    pub fn with_store(session: Session, store: S) -> Self {
        let lines = if session.text().is_empty() {
            0
        } else {
            session.text().split('\n').count()
        };
        Self {
            session,
            store,
            lines,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handle(&mut self, input: &str) -> Step {
        match input.trim().strip_prefix(':') {
            Some(command) => self.command(command.trim()),
            None => self.append(input),
        }
    }

    fn append(&mut self, line: &str) -> Step {
        let text = if self.lines == 0 {
            line.to_string()
        } else {
            format!("{}\n{line}", self.session.text())
        };
        self.lines += 1;
        self.session.edit(text);
        let outcome = self.session.refresh();
        match outcome.display.get(self.lines - 1).cloned().flatten() {
            Some(result) => Step::Print(result),
            None => Step::Nothing,
        }
    }

    fn command(&mut self, command: &str) -> Step {
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "q" | "quit" | "exit" => Step::Quit,
            "help" => Step::Print(HELP.to_string()),
            "vars" => {
                let vars = self.session.variables();
                if vars.is_empty() {
                    return Step::Print("(no variables)".to_string());
                }
                let listing: Vec<String> = vars
                    .into_iter()
                    .map(|(name, value)| format!("{name} = {value}"))
                    .collect();
                Step::Print(listing.join("\n"))
            }
            "mode" => match arg.parse::<AngleMode>() {
                _ if arg.is_empty() => {
                    let mode = self.session.angle_mode().toggled();
                    self.session.set_angle_mode(mode);
                    self.session.refresh();
                    Step::Print(format!("angle mode {mode}"))
                }
                Ok(mode) => {
                    self.session.set_angle_mode(mode);
                    self.session.refresh();
                    Step::Print(format!("angle mode {mode}"))
                }
                Err(e) => Step::Print(e),
            },
            "precision" => match arg.parse::<i64>() {
                Ok(p) => {
                    self.session.set_precision(p);
                    self.session.refresh();
                    Step::Print(format!("precision {}", self.session.precision()))
                }
                Err(_) => Step::Print(format!("invalid precision '{arg}'")),
            },
            "save" => {
                if arg.is_empty() {
                    return Step::Print("usage: :save <name>".to_string());
                }
                let saved = self.store.save(arg, &self.session);
                tracing::debug!(id = saved.id, name = %saved.name, "session saved");
                Step::Print(format!("saved #{} '{}'", saved.id, saved.name))
            }
            "sessions" => {
                let listing: Vec<String> = self
                    .store
                    .list()
                    .into_iter()
                    .map(|s| format!("#{:<4} {:<20} {}", s.id, s.name, s.created_at_rfc3339()))
                    .collect();
                if listing.is_empty() {
                    Step::Print("(no saved sessions)".to_string())
                } else {
                    Step::Print(listing.join("\n"))
                }
            }
            "open" => match self.lookup(arg) {
                Ok(id) => {
                    let Some(saved) = self.store.get(id) else {
                        return Step::Print(format!("no session #{id}"));
                    };
                    let (name, content) = (saved.name.clone(), saved.content.clone());
                    self.lines = content.split('\n').count();
                    self.session.edit(content);
                    self.session.refresh();
                    Step::Print(format!("opened #{id} '{name}' ({} lines)", self.lines))
                }
                Err(msg) => Step::Print(msg),
            },
            "delete" => match self.lookup(arg) {
                Ok(id) if self.store.delete(id) => Step::Print(format!("deleted #{id}")),
                Ok(id) => Step::Print(format!("no session #{id}")),
                Err(msg) => Step::Print(msg),
            },
            "clear" => {
                self.session.clear();
                self.lines = 0;
                Step::Nothing
            }
            _ => Step::Print(format!("unknown command ':{name}' (try :help)")),
        }
    }

    fn lookup(&self, arg: &str) -> Result<u64, String> {
        arg.trim_start_matches('#')
            .parse()
            .map_err(|_| format!("invalid session id '{arg}'"))
    }
}
