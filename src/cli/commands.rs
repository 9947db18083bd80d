use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sd",
    about = concat!("sharedo v", env!("CARGO_PKG_VERSION"), " - shared to-do lists, offline"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Store directory (default: .sharedo in the current directory)
    #[arg(short = 'C', long = "store-dir", global = true)]
    pub store_dir: Option<String>,

    /// Config file (default: <store-dir>/sharedo.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new list
    New(NewArgs),
    /// Show lists owned by or shared with you
    Lists,
    /// Show a list with its items and subtasks
    Show(ShowArgs),
    /// Append an item to a list
    Add(AddArgs),
    /// Rename a list
    Title(TitleArgs),
    /// Edit an item's title, cost, type or required flag
    Item(ItemArgs),
    /// Toggle an item's done flag (saved immediately)
    Done(ItemRef),
    /// Remove an item
    Rm(ItemRef),
    /// Move an item to another position
    Mv(MvArgs),
    /// Subtask editing
    Sub(SubCmd),
    /// Custom field editing
    Field(FieldCmd),
    /// Share a list by email
    Share(ShareArgs),
    /// Freeze (or unfreeze) a list
    Freeze(FreezeArgs),
    /// Mark a list completed (or reopen it)
    Complete(CompleteArgs),
    /// Permanently delete a list
    Delete(ListRef),
}

// ---------------------------------------------------------------------------
// List-level args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NewArgs {
    /// List title
    #[arg(default_value = "New List")]
    pub title: String,
}

/// Lists and items accept any unique id prefix.
#[derive(Args)]
pub struct ListRef {
    /// List ID
    pub list: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// List ID
    pub list: String,
    /// Only show items matching: none, completed, in_progress
    #[arg(long, default_value = "none")]
    pub filter: String,
}

#[derive(Args)]
pub struct TitleArgs {
    /// List ID
    pub list: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct ShareArgs {
    /// List ID
    pub list: String,
    /// Recipient email address
    pub email: String,
}

#[derive(Args)]
pub struct FreezeArgs {
    /// List ID
    pub list: String,
    /// Unfreeze instead
    #[arg(long)]
    pub off: bool,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// List ID
    pub list: String,
    /// Reopen instead
    #[arg(long)]
    pub undo: bool,
}

// ---------------------------------------------------------------------------
// Item args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ItemRef {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// List ID
    pub list: String,
    /// Item title (default from config)
    pub title: Option<String>,
    /// Item cost
    #[arg(long)]
    pub cost: Option<f64>,
    /// Item type: task, food, item
    #[arg(long = "type")]
    pub kind: Option<String>,
}

#[derive(Args)]
pub struct ItemArgs {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New cost
    #[arg(long)]
    pub cost: Option<f64>,
    /// New type: task, food, item, or --- to clear
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Required flag
    #[arg(long)]
    pub required: Option<bool>,
}

#[derive(Args)]
pub struct MvArgs {
    /// List ID
    pub list: String,
    /// Current position (0-based)
    pub from: usize,
    /// Target position (0-based)
    pub to: usize,
}

// ---------------------------------------------------------------------------
// Subtask args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubCmd {
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Add a subtask at the item root, or under --parent
    Add(SubAddArgs),
    /// Edit a subtask
    Set(SubSetArgs),
    /// Toggle a subtask's done flag
    Done(SubRef),
    /// Remove a subtask and everything below it
    Rm(SubRef),
}

#[derive(Args)]
pub struct SubAddArgs {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
    /// Subtask title (default from config)
    pub title: Option<String>,
    /// Parent subtask ID
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct SubRef {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
    /// Subtask ID
    pub sub: String,
}

#[derive(Args)]
pub struct SubSetArgs {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
    /// Subtask ID
    pub sub: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// Required flag
    #[arg(long)]
    pub required: Option<bool>,
}

// ---------------------------------------------------------------------------
// Custom field args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct FieldCmd {
    #[command(subcommand)]
    pub action: FieldAction,
}

#[derive(Subcommand)]
pub enum FieldAction {
    /// Append a custom field to an item
    Add(FieldAddArgs),
    /// Edit the field at an index
    Set(FieldSetArgs),
    /// Remove the field at an index
    Rm(FieldRef),
}

#[derive(Args)]
pub struct FieldAddArgs {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
    /// Field title
    #[arg(long)]
    pub title: Option<String>,
    /// Field value (true/false and numbers are typed)
    #[arg(long)]
    pub value: Option<String>,
    /// Mark the field required
    #[arg(long)]
    pub required: bool,
}

#[derive(Args)]
pub struct FieldRef {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
    /// Field index (0-based)
    pub index: usize,
}

#[derive(Args)]
pub struct FieldSetArgs {
    /// List ID
    pub list: String,
    /// Item ID
    pub item: String,
    /// Field index (0-based)
    pub index: usize,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New value
    #[arg(long)]
    pub value: Option<String>,
    /// Required flag
    #[arg(long)]
    pub required: Option<bool>,
}
