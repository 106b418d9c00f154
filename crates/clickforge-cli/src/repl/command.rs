//! Parsing of studio commands typed at the prompt.

use std::path::PathBuf;

use clickforge_core::{AspectRatio, ParamField};

/// Command names with their usage and a one-line description.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("topic", "topic <text>", "set the video topic"),
    ("set", "set <field> <value>", "set style, audience, goal, lighting, angle, ratio or viral"),
    ("ratio", "ratio <16:9|9:16|1:1|4:3>", "set the aspect ratio"),
    ("viral", "viral [on|off]", "toggle or set viral mode"),
    ("reference", "reference <path>|clear", "attach or remove a reference image"),
    ("analyze", "analyze", "research trends and brainstorm concepts"),
    ("concepts", "concepts", "show the current strategy"),
    ("select", "select <n>", "render concept n"),
    ("refine", "refine <instruction>", "edit the active thumbnail"),
    ("open", "open <n>", "open vault entry n"),
    ("close", "close", "close the active thumbnail"),
    ("vault", "vault", "list saved thumbnails"),
    ("export", "export [path]", "save the active thumbnail as PNG"),
    ("clear-vault", "clear-vault", "delete every saved thumbnail"),
    ("status", "status", "show parameters and session state"),
    ("help", "help", "show this help"),
    ("quit", "quit", "leave the studio"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceArg {
    Path(PathBuf),
    Clear,
}

/// A parsed studio command. Indices are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub enum StudioCommand {
    Topic(String),
    Set(ParamField, String),
    Ratio(AspectRatio),
    /// `None` toggles.
    Viral(Option<bool>),
    Reference(ReferenceArg),
    Analyze,
    Concepts,
    Select(usize),
    Refine(String),
    Open(usize),
    Close,
    Vault,
    Export(Option<PathBuf>),
    ClearVault,
    Status,
    Help,
    Quit,
}

impl StudioCommand {
    /// Parses one input line. Errors are messages for the user.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "topic" => StudioCommand::Topic(required(rest, "topic <text>")?.to_string()),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: set <field> <value>".to_string())?;
                let field: ParamField = field
                    .parse()
                    .map_err(|_| format!("unknown field '{field}'"))?;
                StudioCommand::Set(field, value.trim().to_string())
            }
            "ratio" => StudioCommand::Ratio(
                AspectRatio::parse(required(rest, "ratio <16:9|9:16|1:1|4:3>")?)
                    .map_err(|e| e.to_string())?,
            ),
            "viral" => StudioCommand::Viral(match rest.to_ascii_lowercase().as_str() {
                "" => None,
                "on" => Some(true),
                "off" => Some(false),
                other => return Err(format!("viral expects on or off, got '{other}'")),
            }),
            "reference" | "ref" => {
                let arg = required(rest, "reference <path>|clear")?;
                if arg.eq_ignore_ascii_case("clear") {
                    StudioCommand::Reference(ReferenceArg::Clear)
                } else {
                    StudioCommand::Reference(ReferenceArg::Path(PathBuf::from(arg)))
                }
            }
            "analyze" | "analyse" => StudioCommand::Analyze,
            "concepts" => StudioCommand::Concepts,
            "select" => StudioCommand::Select(index(rest, "select <n>")?),
            "refine" => StudioCommand::Refine(required(rest, "refine <instruction>")?.to_string()),
            "open" => StudioCommand::Open(index(rest, "open <n>")?),
            "close" => StudioCommand::Close,
            "vault" | "history" => StudioCommand::Vault,
            "export" | "download" => {
                StudioCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))
            }
            "clear-vault" => StudioCommand::ClearVault,
            "status" => StudioCommand::Status,
            "help" | "?" => StudioCommand::Help,
            "quit" | "exit" => StudioCommand::Quit,
            other => return Err(format!("unknown command '{other}', type 'help'")),
        };
        Ok(command)
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

/// Parses a one-based position into an index.
fn index(rest: &str, usage: &str) -> Result<usize, String> {
    match rest.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("usage: {usage} (n starts at 1)")),
    }
}
