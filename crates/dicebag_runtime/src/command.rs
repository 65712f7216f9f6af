//! The command language.
//!
//! A line is a `|`-separated sequence of steps; each step is a keyword
//! followed by whitespace-separated arguments:
//!
//! ```text
//! create Bag +2 | create d6 6 | select Bag | add d6 | roll
//! ```
//!
//! Steps are parsed one at a time as they run, so a malformed later step
//! doesn't stop earlier ones from taking effect.

use dicebag_foundation::{Error, Result, is_modifier_token, parse_modifier};

/// Every command keyword, in help order.
pub const KEYWORDS: &[&str] = &[
    "add", "create", "delete", "list", "modifier", "remove", "rename", "roll", "select", "f_delete",
    "f_list", "f_load", "f_rename", "f_save", "exit", "help",
];

/// Help text for the `help` command.
pub const HELP: &str = "\
The loaded file and the selected object are shown in the prompt.
Commands apply to the selected object. Separate arguments with whitespace.
'|' runs several commands in order; the first failure aborts the rest.
Modifiers must start with '+' or '-'.

DICE MANAGEMENT
add      <name|value>              add a member to the selected collection, or a face to the selected die
create   <name> [+/-mod]           create a collection
         <name> [+/-mod] <n>       create a die with faces 1..n
         <name> [+/-mod] <v> <v>.. create a die with the given face values
delete                             delete the selected object everywhere
list                               list all objects, or the selected one
modifier <+/-mod>                  set the selected object's modifier
remove   <name|value>              remove a member or a face from the selected object
rename   <name>                    rename the selected object
roll     [quick]                   roll the selected object; 'quick' prints only the total
select   [name]                    select an object, or clear the selection

FILE MANAGEMENT
f_delete [name]                    delete the loaded file, or the named file
f_list                             list saved files
f_load   <name>                    save the loaded file, then load (or start) the named file
f_rename <new> | <old> <new>       rename the loaded file, or the named file
f_save   [name]                    save to the loaded file, or to a new name

MISCELLANEOUS
exit     [nosave]                  exit, saving the loaded file unless 'nosave'
help                               show this menu";

/// One `|`-separated step of an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The step as typed, trimmed.
    pub text: String,
    /// Keyword followed by arguments.
    pub args: Vec<String>,
}

/// Splits an input line into steps. Empty steps are dropped.
#[must_use]
pub fn split(input: &str) -> Vec<Step> {
    input
        .split('|')
        .map(|text| Step {
            text: text.trim().to_string(),
            args: text.split_whitespace().map(String::from).collect(),
        })
        .filter(|step| !step.args.is_empty())
        .collect()
}

/// Checks that a line only uses characters the command language knows:
/// word characters, `|`, `-`, `+`, and whitespace.
///
/// # Errors
///
/// Returns `InvalidArgument` naming the first offending character.
pub fn validate_line(input: &str) -> Result<()> {
    match input
        .chars()
        .find(|&c| !(c.is_alphanumeric() || c == '_' || c == '|' || c == '-' || c == '+' || c.is_whitespace()))
    {
        Some(c) => Err(Error::invalid_argument(format!("invalid input character '{c}'"))),
        None => Ok(()),
    }
}

/// What kind of entity `create` builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// An empty collection.
    Collection,
    /// A die with faces `1..=n`.
    Numbered(i64),
    /// A die with explicit faces.
    Faces(Vec<i64>),
}

/// A parsed command step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `create <name> [mod] [faces...]`
    Create {
        /// Name of the new entity.
        name: String,
        /// Starting modifier.
        modifier: i64,
        /// Die or collection.
        shape: Shape,
    },
    /// `delete`
    Delete,
    /// `rename <name>`
    Rename {
        /// New name.
        name: String,
    },
    /// `modifier <+/-n>`
    Modifier {
        /// New modifier.
        value: i64,
    },
    /// `add <name|value>`; meaning depends on the selection.
    Add {
        /// Member name or face value, uninterpreted.
        arg: String,
    },
    /// `remove <name|value>`; meaning depends on the selection.
    Remove {
        /// Member name or face value, uninterpreted.
        arg: String,
    },
    /// `select [name]`
    Select {
        /// Entity to select; `None` clears the selection.
        name: Option<String>,
    },
    /// `list`
    List,
    /// `roll [quick]`
    Roll {
        /// Print only the total.
        quick: bool,
    },
    /// `f_load <name>`
    FileLoad {
        /// File to load or start.
        name: String,
    },
    /// `f_save [name]`
    FileSave {
        /// Target file; `None` means the loaded file.
        name: Option<String>,
    },
    /// `f_delete [name]`
    FileDelete {
        /// File to delete; `None` means the loaded file.
        name: Option<String>,
    },
    /// `f_rename <new>` or `f_rename <old> <new>`
    FileRename {
        /// File to rename; `None` means the loaded file.
        old: Option<String>,
        /// New file name.
        new: String,
    },
    /// `f_list`
    FileList,
    /// `help`
    Help,
    /// `exit [nosave]`
    Exit {
        /// Save the loaded file before exiting.
        save: bool,
    },
}

fn arity(keyword: &str) -> Error {
    Error::invalid_argument(format!("invalid parameter count for '{keyword}'"))
}

fn parse_int(token: &str) -> Result<i64> {
    token
        .parse::<i64>()
        .map_err(|_| Error::invalid_argument(format!("wrong parameter type: {token}")))
}

fn parse_faces(tokens: &[String]) -> Result<Vec<i64>> {
    tokens.iter().map(|token| parse_int(token)).collect()
}

impl Command {
    /// Parses one step's keyword and arguments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown keyword, a wrong argument
    /// count, or an argument of the wrong type.
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((keyword, rest)) = args.split_first() else {
            return Err(Error::invalid_argument("empty command"));
        };

        match (keyword.as_str(), rest) {
            ("create", _) => Self::parse_create(rest),

            ("delete", []) => Ok(Self::Delete),
            ("rename", [name]) => Ok(Self::Rename { name: name.clone() }),
            ("modifier", [value]) => Ok(Self::Modifier {
                value: parse_modifier(value)?,
            }),
            ("add", [arg]) => Ok(Self::Add { arg: arg.clone() }),
            ("remove", [arg]) => Ok(Self::Remove { arg: arg.clone() }),
            ("select", []) => Ok(Self::Select { name: None }),
            ("select", [name]) => Ok(Self::Select {
                name: Some(name.clone()),
            }),
            ("list", []) => Ok(Self::List),
            ("roll", []) => Ok(Self::Roll { quick: false }),
            ("roll", [flag]) if flag == "quick" => Ok(Self::Roll { quick: true }),
            ("roll", [flag]) => Err(Error::invalid_argument(format!(
                "unrecognized parameter: {flag}"
            ))),

            ("f_load", [name]) => Ok(Self::FileLoad { name: name.clone() }),
            ("f_save", []) => Ok(Self::FileSave { name: None }),
            ("f_save", [name]) => Ok(Self::FileSave {
                name: Some(name.clone()),
            }),
            ("f_delete", []) => Ok(Self::FileDelete { name: None }),
            ("f_delete", [name]) => Ok(Self::FileDelete {
                name: Some(name.clone()),
            }),
            ("f_rename", [new]) => Ok(Self::FileRename {
                old: None,
                new: new.clone(),
            }),
            ("f_rename", [old, new]) => Ok(Self::FileRename {
                old: Some(old.clone()),
                new: new.clone(),
            }),
            ("f_list", []) => Ok(Self::FileList),

            ("help", []) => Ok(Self::Help),
            ("exit", []) => Ok(Self::Exit { save: true }),
            ("exit", [flag]) if flag == "nosave" => Ok(Self::Exit { save: false }),
            ("exit", [flag]) => Err(Error::invalid_argument(format!(
                "unrecognized parameter: {flag}"
            ))),

            (kw, _) if KEYWORDS.contains(&kw) => Err(arity(kw)),
            (kw, _) => Err(Error::invalid_argument(format!(
                "command not recognized: {kw}"
            ))),
        }
    }

    fn parse_create(rest: &[String]) -> Result<Self> {
        let Some((name, tail)) = rest.split_first() else {
            return Err(arity("create"));
        };

        let (modifier, tail) = match tail.split_first() {
            Some((first, after)) if is_modifier_token(first) => (parse_modifier(first)?, after),
            _ => (0, tail),
        };

        let shape = match tail {
            [] => Shape::Collection,
            [count] => Shape::Numbered(parse_int(count)?),
            faces => Shape::Faces(parse_faces(faces)?),
        };

        Ok(Self::Create {
            name: name.clone(),
            modifier,
            shape,
        })
    }

    /// Returns the keyword this command was parsed from.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Delete => "delete",
            Self::Rename { .. } => "rename",
            Self::Modifier { .. } => "modifier",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Select { .. } => "select",
            Self::List => "list",
            Self::Roll { .. } => "roll",
            Self::FileLoad { .. } => "f_load",
            Self::FileSave { .. } => "f_save",
            Self::FileDelete { .. } => "f_delete",
            Self::FileRename { .. } => "f_rename",
            Self::FileList => "f_list",
            Self::Help => "help",
            Self::Exit { .. } => "exit",
        }
    }
}
