//! REPL command parsing

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send { text: String, use_reasoning: bool },
    New,
    List { search: String },
    Open(String),
    Delete,
    Star,
    Title(String),
    Move(Option<String>),
    Regenerate,
    FolderCreate(String),
    FolderRename { id: String, name: String },
    FolderDelete(String),
    FolderToggle(String),
    Model(Option<String>),
    Help,
    Quit,
}

pub const HELP: &str = "\
Type a message to send it. Commands:
  /think <text>              send with reasoning
  /new                       start a new conversation
  /list [search]             show the sidebar
  /open <n|id>               select a conversation
  /delete                    delete the current conversation
  /star                      toggle star on the current conversation
  /title <text>              rename the current conversation
  /move <folder-id|none>     move the current conversation
  /regen                     regenerate the last reply
  /folder new <name>
  /folder rename <id> <name>
  /folder delete <id>
  /folder toggle <id>
  /model [id]                show or select the model
  /help
  /quit";

/// Parse one input line; `Err` carries a usage hint
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Send {
            text: line.to_string(),
            use_reasoning: false,
        }));
    };

    let (name, args) = split_word(rest);
    let command = match name {
        "think" => Command::Send {
            text: required(args, "/think <text>")?,
            use_reasoning: true,
        },
        "new" => Command::New,
        "list" | "ls" => Command::List {
            search: args.to_string(),
        },
        "open" => Command::Open(required(args, "/open <n|id>")?),
        "delete" => Command::Delete,
        "star" => Command::Star,
        "title" => Command::Title(required(args, "/title <text>")?),
        "move" => match required(args, "/move <folder-id|none>")?.as_str() {
            "none" => Command::Move(None),
            id => Command::Move(Some(id.to_string())),
        },
        "regen" | "regenerate" => Command::Regenerate,
        "folder" => parse_folder(args)?,
        "model" => Command::Model((!args.is_empty()).then(|| args.to_string())),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command /{} (try /help)", other)),
    };
    Ok(Some(command))
}

fn parse_folder(args: &str) -> Result<Command, String> {
    let (action, rest) = split_word(args);
    match action {
        "new" => Ok(Command::FolderCreate(required(rest, "/folder new <name>")?)),
        "rename" => {
            let (id, name) = split_word(rest);
            if id.is_empty() || name.is_empty() {
                return Err("usage: /folder rename <id> <name>".to_string());
            }
            Ok(Command::FolderRename {
                id: id.to_string(),
                name: name.to_string(),
            })
        }
        "delete" => Ok(Command::FolderDelete(required(rest, "/folder delete <id>")?)),
        "toggle" => Ok(Command::FolderToggle(required(rest, "/folder toggle <id>")?)),
        _ => Err("usage: /folder new|rename|delete|toggle ...".to_string()),
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required(args: &str, usage: &str) -> Result<String, String> {
    if args.is_empty() {
        Err(format!("usage: {}", usage))
    } else {
        Ok(args.to_string())
    }
}
