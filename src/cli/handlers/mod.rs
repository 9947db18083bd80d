use std::error::Error;
use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::logging;
use crate::io::store::JsonStore;
use crate::model::config::ClientConfig;
use crate::model::item::{FieldValue, Item, ItemKind};
use crate::model::list::TodoList;
use crate::ops::item_ops::ItemFilter;
use crate::ops::subtask_tree;
use crate::remote::{AuthSession, NullChannel, StaticAuth, Transport};
use crate::session::{Edit, ListEditSession};

type CmdResult = Result<(), Box<dyn Error>>;

/// Store directory used when -C is not given
pub const DEFAULT_STORE_DIR: &str = ".sharedo";

struct Context {
    store: JsonStore,
    config: ClientConfig,
    auth: StaticAuth,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let store_dir = PathBuf::from(cli.store_dir.as_deref().unwrap_or(DEFAULT_STORE_DIR));
    let config_file = match cli.config {
        Some(path) => PathBuf::from(path),
        None => config_io::config_path(&store_dir),
    };
    let config = config_io::read_config(&config_file)?;
    logging::init(&config.log);

    let store = JsonStore::open(&store_dir)?;
    // The offline store needs no token
    let auth = StaticAuth::new(config.user.id.clone(), "");
    let ctx = Context {
        store,
        config,
        auth,
        json: cli.json,
    };

    match cli.command {
        // Read commands
        Commands::Lists => cmd_lists(&ctx),
        Commands::Show(args) => cmd_show(&ctx, args),

        // List lifecycle
        Commands::New(args) => cmd_new(&ctx, args),
        Commands::Title(args) => cmd_title(&ctx, args),
        Commands::Share(args) => cmd_share(&ctx, args),
        Commands::Freeze(args) => cmd_freeze(&ctx, args),
        Commands::Complete(args) => cmd_complete(&ctx, args),
        Commands::Delete(args) => cmd_delete(&ctx, args),

        // Items
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Item(args) => cmd_item(&ctx, args),
        Commands::Done(args) => cmd_done(&ctx, args),
        Commands::Rm(args) => cmd_rm(&ctx, args),
        Commands::Mv(args) => cmd_mv(&ctx, args),

        Commands::Sub(cmd) => match cmd.action {
            SubAction::Add(args) => cmd_sub_add(&ctx, args),
            SubAction::Set(args) => cmd_sub_set(&ctx, args),
            SubAction::Done(args) => cmd_sub_done(&ctx, args),
            SubAction::Rm(args) => cmd_sub_rm(&ctx, args),
        },
        Commands::Field(cmd) => match cmd.action {
            FieldAction::Add(args) => cmd_field_add(&ctx, args),
            FieldAction::Set(args) => cmd_field_set(&ctx, args),
            FieldAction::Rm(args) => cmd_field_rm(&ctx, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl Context {
    fn resolve_list(&self, list_ref: &str) -> Result<String, String> {
        let lists = self
            .store
            .user_lists(self.auth.user_id())
            .map_err(|e| e.to_string())?;
        resolve_prefix(lists.iter().map(|l| l.id.as_str()), list_ref, "list")
    }

    fn session(&self, list_ref: &str) -> Result<ListEditSession, Box<dyn Error>> {
        let id = self.resolve_list(list_ref)?;
        Ok(ListEditSession::fetch(
            &id,
            &self.auth,
            Box::new(self.store.clone()),
            Box::new(NullChannel),
            self.config.session.clone(),
        )?)
    }

    /// Print the list as JSON, or `message` as text
    fn report(&self, list: &TodoList, message: &str) -> CmdResult {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&list_to_json(list))?);
        } else {
            println!("{}", message);
        }
        Ok(())
    }
}

/// Resolve a possibly abbreviated id. An exact match always wins.
fn resolve_prefix<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    prefix: &str,
    what: &str,
) -> Result<String, String> {
    if prefix.is_empty() {
        return Err(format!("empty {} id", what));
    }
    let matches: Vec<&str> = ids.into_iter().filter(|id| id.starts_with(prefix)).collect();
    if matches.contains(&prefix) {
        return Ok(prefix.to_string());
    }
    match matches.as_slice() {
        [] => Err(format!("{} not found: {}", what, prefix)),
        [id] => Ok(id.to_string()),
        _ => Err(format!("ambiguous {} id: {} ({} matches)", what, prefix, matches.len())),
    }
}

fn resolve_item(session: &ListEditSession, item_ref: &str) -> Result<String, String> {
    resolve_prefix(
        session.list().items.iter().map(|i| i.id.as_str()),
        item_ref,
        "item",
    )
}

fn resolve_subtask(item: &Item, sub_ref: &str) -> Result<String, String> {
    let mut ids = Vec::new();
    subtask_tree::for_each(&item.subtasks, &mut |sub, _| ids.push(sub.id.clone()));
    resolve_prefix(ids.iter().map(String::as_str), sub_ref, "subtask")
}

fn item_of<'a>(session: &'a ListEditSession, id: &str) -> Result<&'a Item, String> {
    session
        .list()
        .item(id)
        .ok_or_else(|| format!("item not found: {}", id))
}

/// Locked edits are errors on the command line
fn check_edit(edit: Edit) -> Result<Edit, String> {
    match edit {
        Edit::Locked => Err("list is locked (frozen or completed)".to_string()),
        other => Ok(other),
    }
}

fn parse_kind(s: &str) -> Result<Option<ItemKind>, String> {
    match s.trim() {
        "" | "---" => Ok(None),
        other => ItemKind::parse(other)
            .map(Some)
            .ok_or_else(|| format!("unknown type '{}' (expected: task, food, item, ---)", other)),
    }
}

fn save(session: &mut ListEditSession) -> CmdResult {
    if session.is_dirty() {
        session.save()?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_lists(ctx: &Context) -> CmdResult {
    let lists = ctx.store.user_lists(ctx.auth.user_id())?;
    if ctx.json {
        let out: Vec<ListSummaryJson> = lists.iter().map(list_to_summary_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if lists.is_empty() {
        println!("no lists");
    }
    for list in &lists {
        println!("{}", format_list_summary(list));
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> CmdResult {
    let filter: ItemFilter = args.filter.parse()?;
    let mut session = ctx.session(&args.list)?;
    session.set_filter(filter);

    if ctx.json {
        // Totals always describe the whole list; only `items` is filtered
        let mut out = serde_json::to_value(list_to_json(session.list()))?;
        out["items"] = serde_json::to_value(session.visible_items())?;
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_list_detail(session.list(), session.filter()) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// List lifecycle
// ---------------------------------------------------------------------------

fn cmd_new(ctx: &Context, args: NewArgs) -> CmdResult {
    let list = ctx.store.create_list(ctx.auth.user_id(), &args.title)?;
    ctx.report(&list, &list.id)
}

fn cmd_title(ctx: &Context, args: TitleArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    check_edit(session.set_title(args.title)?)?;
    save(&mut session)?;
    ctx.report(session.list(), "title updated")
}

fn cmd_share(ctx: &Context, args: ShareArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    session.share_with(&args.email)?;
    ctx.report(session.list(), &format!("shared with {}", args.email))
}

fn cmd_freeze(ctx: &Context, args: FreezeArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    if !session.can_toggle_freeze() {
        return Err("only the list owner can freeze or unfreeze it".into());
    }
    session.set_frozen(!args.off)?;
    let msg = if args.off { "unfrozen" } else { "frozen" };
    ctx.report(session.list(), msg)
}

fn cmd_complete(ctx: &Context, args: CompleteArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    session.set_completed(!args.undo)?;
    save(&mut session)?;
    let msg = if args.undo { "reopened" } else { "completed" };
    ctx.report(session.list(), msg)
}

fn cmd_delete(ctx: &Context, args: ListRef) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let id = session.list().id.clone();
    session.delete()?;
    println!("deleted {}", short_id(&id));
    Ok(())
}

// ---------------------------------------------------------------------------
// Item commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let kind = args.kind.as_deref().map(parse_kind).transpose()?.flatten();
    let mut session = ctx.session(&args.list)?;
    let id = session
        .add_item()?
        .ok_or("list is locked (frozen or completed)")?;
    session.edit_item(&id, |item| {
        if let Some(title) = args.title {
            item.title = title;
        }
        if let Some(cost) = args.cost {
            item.cost = Some(cost);
        }
        item.kind = kind;
    })?;
    save(&mut session)?;
    ctx.report(session.list(), &id)
}

fn cmd_item(ctx: &Context, args: ItemArgs) -> CmdResult {
    let kind = args.kind.as_deref().map(parse_kind).transpose()?;
    let mut session = ctx.session(&args.list)?;
    let id = resolve_item(&session, &args.item)?;
    let edit = check_edit(session.edit_item(&id, |item| {
        if let Some(title) = args.title {
            item.title = title;
        }
        if let Some(cost) = args.cost {
            item.cost = Some(cost);
        }
        if let Some(kind) = kind {
            item.kind = kind;
        }
        if let Some(required) = args.required {
            item.required = required;
        }
    })?)?;
    save(&mut session)?;
    let msg = match edit {
        Edit::Applied => format!("{} updated", short_id(&id)),
        _ => format!("{} unchanged", short_id(&id)),
    };
    ctx.report(session.list(), &msg)
}

fn cmd_done(ctx: &Context, args: ItemRef) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let id = resolve_item(&session, &args.item)?;
    check_edit(session.toggle_item_done(&id)?)?;
    let done = item_of(&session, &id)?.done;
    let msg = format!("{} {}", short_id(&id), if done { "done" } else { "not done" });
    ctx.report(session.list(), &msg)
}

fn cmd_rm(ctx: &Context, args: ItemRef) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let id = resolve_item(&session, &args.item)?;
    check_edit(session.remove_item(&id)?)?;
    save(&mut session)?;
    ctx.report(session.list(), &format!("{} removed", short_id(&id)))
}

fn cmd_mv(ctx: &Context, args: MvArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    check_edit(session.reorder_items(args.from, args.to)?)?;
    save(&mut session)?;
    ctx.report(session.list(), &format!("moved {} -> {}", args.from, args.to))
}

// ---------------------------------------------------------------------------
// Subtask commands
// ---------------------------------------------------------------------------

fn cmd_sub_add(ctx: &Context, args: SubAddArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let item_id = resolve_item(&session, &args.item)?;
    let sub_id = match &args.parent {
        Some(parent) => {
            let parent_id = resolve_subtask(item_of(&session, &item_id)?, parent)?;
            session.add_nested_subtask(&item_id, &parent_id)?
        }
        None => session.add_subtask(&item_id)?,
    }
    .ok_or("list is locked (frozen or completed)")?;

    if let Some(title) = args.title {
        session.edit_subtask(&item_id, &sub_id, |sub| sub.title = title)?;
    }
    save(&mut session)?;
    ctx.report(session.list(), &sub_id)
}

fn cmd_sub_set(ctx: &Context, args: SubSetArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let item_id = resolve_item(&session, &args.item)?;
    let sub_id = resolve_subtask(item_of(&session, &item_id)?, &args.sub)?;
    check_edit(session.edit_subtask(&item_id, &sub_id, |sub| {
        if let Some(title) = args.title {
            sub.title = title;
        }
        if let Some(required) = args.required {
            sub.required = required;
        }
    })?)?;
    save(&mut session)?;
    ctx.report(session.list(), &format!("{} updated", short_id(&sub_id)))
}

fn cmd_sub_done(ctx: &Context, args: SubRef) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let item_id = resolve_item(&session, &args.item)?;
    let sub_id = resolve_subtask(item_of(&session, &item_id)?, &args.sub)?;
    check_edit(session.toggle_subtask_done(&item_id, &sub_id)?)?;
    save(&mut session)?;
    let done = subtask_tree::find(&item_of(&session, &item_id)?.subtasks, &sub_id)
        .is_some_and(|s| s.done);
    let msg = format!("{} {}", short_id(&sub_id), if done { "done" } else { "not done" });
    ctx.report(session.list(), &msg)
}

fn cmd_sub_rm(ctx: &Context, args: SubRef) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let item_id = resolve_item(&session, &args.item)?;
    let item = item_of(&session, &item_id)?;
    let sub_id = resolve_subtask(item, &args.sub)?;
    let removed = subtask_tree::find(&item.subtasks, &sub_id)
        .map_or(0, |sub| subtask_tree::count(std::slice::from_ref(sub)));
    check_edit(session.remove_subtask(&item_id, &sub_id)?)?;
    save(&mut session)?;
    let msg = format!("{} removed ({} subtasks)", short_id(&sub_id), removed);
    ctx.report(session.list(), &msg)
}

// ---------------------------------------------------------------------------
// Custom field commands
// ---------------------------------------------------------------------------

fn cmd_field_add(ctx: &Context, args: FieldAddArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let item_id = resolve_item(&session, &args.item)?;
    let index = session
        .add_custom_field(&item_id)?
        .ok_or("list is locked (frozen or completed)")?;

    let mut field = item_of(&session, &item_id)?.custom_fields[index].clone();
    if let Some(title) = args.title {
        field.title = title;
    }
    if let Some(value) = args.value {
        field.value = FieldValue::from_input(&value);
    }
    field.required = args.required;
    session.update_custom_field(&item_id, index, field)?;
    save(&mut session)?;
    ctx.report(session.list(), &format!("field #{} added", index))
}

fn cmd_field_set(ctx: &Context, args: FieldSetArgs) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let item_id = resolve_item(&session, &args.item)?;
    // An out-of-range index is reported by update_custom_field
    let mut field = item_of(&session, &item_id)?
        .custom_fields
        .get(args.index)
        .cloned()
        .unwrap_or_default();
    if let Some(title) = args.title {
        field.title = title;
    }
    if let Some(value) = args.value {
        field.value = FieldValue::from_input(&value);
    }
    if let Some(required) = args.required {
        field.required = required;
    }
    check_edit(session.update_custom_field(&item_id, args.index, field)?)?;
    save(&mut session)?;
    ctx.report(session.list(), &format!("field #{} updated", args.index))
}

fn cmd_field_rm(ctx: &Context, args: FieldRef) -> CmdResult {
    let mut session = ctx.session(&args.list)?;
    let item_id = resolve_item(&session, &args.item)?;
    check_edit(session.remove_custom_field(&item_id, args.index)?)?;
    save(&mut session)?;
    ctx.report(session.list(), &format!("field #{} removed", args.index))
}
