use clap::{Parser, Subcommand};
use notehubapp::model::NoteTag;

#[derive(Parser, Debug)]
#[command(
    name = "notehub",
    bin_name = "notehub",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Terminal client for NoteHub notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Use a seeded in-memory store instead of the API
    #[arg(long, global = true, help_heading = "Options")]
    pub demo: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List notes
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Search term (title and content)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a note
    #[command(alias = "n", display_order = 2)]
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,

        /// Todo, Work, Personal, Meeting or Shopping
        #[arg(long, default_value = "Todo")]
        tag: NoteTag,
    },

    /// Delete one or more notes by id
    #[command(alias = "rm", display_order = 3)]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Interactive list with live search
    #[command(display_order = 4)]
    Browse,

    /// Show the effective configuration
    #[command(display_order = 5)]
    Config,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::List {
            page: 1,
            search: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn naked_invocation_has_no_command() {
        assert_eq!(parse(&["notehub"]).command, None);
    }

    #[test]
    fn list_defaults_to_first_page() {
        let cli = parse(&["notehub", "ls", "--search", "tea"]);
        assert_eq!(
            cli.command,
            Some(Commands::List {
                page: 1,
                search: Some("tea".into())
            })
        );
    }

    #[test]
    fn create_parses_tag_case_insensitively() {
        let cli = parse(&["notehub", "create", "-t", "Buy milk", "--tag", "shopping"]);
        assert_eq!(
            cli.command,
            Some(Commands::Create {
                title: "Buy milk".into(),
                content: String::new(),
                tag: NoteTag::Shopping,
            })
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(Cli::try_parse_from(["notehub", "create", "-t", "abc", "--tag", "urgent"]).is_err());
    }

    #[test]
    fn delete_needs_an_id() {
        assert!(Cli::try_parse_from(["notehub", "delete"]).is_err());
        let cli = parse(&["notehub", "rm", "a", "b", "--demo"]);
        assert!(cli.demo);
        assert_eq!(
            cli.command,
            Some(Commands::Delete {
                ids: vec!["a".into(), "b".into()]
            })
        );
    }
}
