use clap::{Args, Parser, Subcommand};

use complaintdesk_core::models::{ComplaintPriority, ComplaintStatus, UserRole};

#[derive(Debug, Parser)]
#[command(name = "complaintdesk", version, about = "Sunberry complaints tracker client")]
pub struct Cli {
    /// API base address (overrides the config file)
    #[arg(long, global = true, env = "COMPLAINTDESK_API_URL")]
    pub api_url: Option<String>,

    /// Keep the cached password in the session file instead of the OS keychain
    #[arg(long, global = true, env = "COMPLAINTDESK_NO_KEYRING")]
    pub no_keyring: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and cache the session
    Login {
        /// Defaults to the last username used
        username: Option<String>,
    },
    /// Discard the cached session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Work with complaints
    #[command(subcommand)]
    Complaints(ComplaintsCommand),
    /// Manage tags
    #[command(subcommand)]
    Tags(TagsCommand),
    /// Admin user management
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Debug, Subcommand)]
pub enum ComplaintsCommand {
    /// List complaints, optionally filtered
    List(ListArgs),
    /// Show a complaint with its history and comments
    Show { id: i64 },
    /// File a new complaint
    Create {
        title: String,
        #[arg(long, short)]
        description: String,
        #[arg(long, short, default_value = "medium")]
        priority: ComplaintPriority,
        /// Tag id, repeatable
        #[arg(long = "tag", short)]
        tags: Vec<i64>,
    },
    /// Change a complaint's status
    Status { id: i64, status: ComplaintStatus },
    /// Assign a complaint to yourself
    Assign { id: i64 },
    /// Add a comment
    Comment { id: i64, text: String },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, short)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<ComplaintStatus>,
    #[arg(long)]
    pub priority: Option<ComplaintPriority>,
    #[arg(long)]
    pub tag: Option<i64>,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Create a user; the password is prompted for
    Create {
        username: String,
        #[arg(long, default_value = "user")]
        role: UserRole,
    },
    /// Set a new password; the password is prompted for
    ResetPassword { id: i64 },
    /// Activate or deactivate a user
    Toggle { id: i64 },
}
