//! Everything in the session that crosses the Transport or channel boundary:
//! saves, the eagerly persisted toggles, sharing and push replacement.

use tracing::{debug, error, info, warn};

use super::list_session::{report_duplicate_ids, Edit, ListEditSession, SessionError};
use crate::model::item::Item;
use crate::model::list::TodoList;
use crate::ops::item_ops;
use crate::ops::share::validate_email;
use crate::remote::{ChannelEvent, RemoteError};

/// A save in flight. Hand it back to [`ListEditSession::finish_save`] with
/// the Transport's answer.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    epoch: u64,
    snapshot: TodoList,
}

impl SaveTicket {
    /// The copy to send to `Transport::persist_list`
    pub fn snapshot(&self) -> &TodoList {
        &self.snapshot
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The session was closed or replaced by a push in the meantime
    Stale,
}

impl ListEditSession {
    // -----------------------------------------------------------------------
    // Batched save
    // -----------------------------------------------------------------------

    /// Persist the working copy and make the returned copy the new baseline.
    pub fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        let ticket = self.begin_save()?;
        let result = self.transport.persist_list(&ticket.snapshot);
        self.finish_save(ticket, result)
    }

    pub fn begin_save(&self) -> Result<SaveTicket, SessionError> {
        self.check_open()?;
        Ok(SaveTicket {
            epoch: self.epoch,
            snapshot: self.working.clone(),
        })
    }

    /// Apply the result of a save started with [`begin_save`].
    ///
    /// Results for an older epoch are dropped. Edits made while the save was
    /// in flight stay in the working copy, so the session remains Dirty.
    ///
    /// [`begin_save`]: ListEditSession::begin_save
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<TodoList, RemoteError>,
    ) -> Result<SaveOutcome, SessionError> {
        if self.closed || ticket.epoch != self.epoch {
            debug!(
                list_id = %ticket.snapshot.id,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "dropping stale save result"
            );
            return Ok(SaveOutcome::Stale);
        }
        match result {
            Ok(saved) => {
                info!(list_id = %saved.id, items = saved.items.len(), "list saved");
                if self.working == ticket.snapshot {
                    self.working = saved.clone();
                    self.baseline = saved;
                } else {
                    debug!(list_id = %saved.id, "edits made during save kept");
                    self.rebase(saved);
                }
                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                error!(list_id = %self.working.id, error = %e, "save failed");
                Err(e.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Eagerly persisted toggles
    // -----------------------------------------------------------------------

    /// Flip `done` on item `id` and persist just that flip right away.
    ///
    /// The outgoing copy is the baseline plus this one change, so other
    /// pending edits stay local until the next [`save`]. A failed call rolls
    /// the flip back. An item that was never saved has nothing to persist
    /// against, so its toggle stays batched.
    ///
    /// [`save`]: ListEditSession::save
    pub fn toggle_item_done(&mut self, id: &str) -> Result<Edit, SessionError> {
        self.check_open()?;
        if self.locked("toggle_item_done") {
            return Ok(Edit::Locked);
        }
        let Some(item) = self.working.item(id) else {
            return self.missing_item(id);
        };
        let done = !item.done;
        let flipped = Item {
            done,
            ..item.clone()
        };
        let items = item_ops::update_by_id(&self.working.items, id, flipped);
        self.commit_items("toggle_item_done", items);

        let Some(base_item) = self.baseline.item(id) else {
            debug!(list_id = %self.working.id, item_id = id, "unsaved item; toggle batched");
            return Ok(Edit::Applied);
        };
        let mut outgoing = self.baseline.clone();
        outgoing.items = item_ops::update_by_id(
            &self.baseline.items,
            id,
            Item {
                done,
                ..base_item.clone()
            },
        );

        match self.transport.persist_list(&outgoing) {
            Ok(saved) => {
                info!(list_id = %saved.id, item_id = id, done, "completion saved");
                self.rebase(saved);
                Ok(Edit::Applied)
            }
            Err(e) => {
                error!(
                    list_id = %self.working.id,
                    item_id = id,
                    error = %e,
                    "completion save failed; reverting"
                );
                if let Some(item) = self.working.item(id) {
                    let reverted = Item {
                        done: !done,
                        ..item.clone()
                    };
                    self.working.items =
                        item_ops::update_by_id(&self.working.items, id, reverted);
                }
                Err(e.into())
            }
        }
    }

    /// Lock or unlock the list. Applied at once and rolled back on failure.
    pub fn set_frozen(&mut self, frozen: bool) -> Result<Edit, SessionError> {
        self.check_open()?;
        if self.working.frozen == frozen {
            return Ok(Edit::Unchanged);
        }
        let previous = self.working.frozen;
        self.working.frozen = frozen;

        match self.transport.set_frozen(&self.working.id, frozen) {
            Ok(saved) => {
                info!(list_id = %saved.id, frozen = saved.frozen, "freeze saved");
                self.working.frozen = saved.frozen;
                self.rebase(saved);
                Ok(Edit::Applied)
            }
            Err(e) => {
                error!(list_id = %self.working.id, error = %e, "freeze failed; reverting");
                self.working.frozen = previous;
                Err(e.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Sharing and lifecycle
    // -----------------------------------------------------------------------

    /// Share the list with `email`. Malformed addresses never reach Transport.
    pub fn share_with(&mut self, email: &str) -> Result<(), SessionError> {
        self.check_open()?;
        if let Err(e) = validate_email(email) {
            debug!(list_id = %self.working.id, error = %e, "share refused locally");
            return Err(e.into());
        }
        let saved = match self.transport.share_list(&self.working.id, email) {
            Ok(saved) => saved,
            Err(e) => {
                error!(list_id = %self.working.id, email, error = %e, "share failed");
                return Err(e.into());
            }
        };
        info!(list_id = %saved.id, email, "list shared");
        self.working.shared_with = saved.shared_with.clone();
        self.rebase(saved);
        Ok(())
    }

    /// Delete the list remotely and close the session.
    pub fn delete(&mut self) -> Result<(), SessionError> {
        self.check_open()?;
        self.transport.delete_list(&self.working.id)?;
        info!(list_id = %self.working.id, "list deleted");
        self.close();
        Ok(())
    }

    /// Discard the working copy. Later save results are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if self.is_dirty() {
            debug!(list_id = %self.working.id, "closing with unsaved edits");
        }
        self.working = self.baseline.clone();
        self.closed = true;
        self.epoch += 1;
    }

    // -----------------------------------------------------------------------
    // Push replacement
    // -----------------------------------------------------------------------

    /// Replace both copies with an authoritative snapshot of this list.
    ///
    /// Last writer wins: unsaved local edits are discarded. Snapshots for
    /// other lists are ignored. Returns whether the snapshot was applied.
    pub fn apply_remote(&mut self, list: TodoList) -> bool {
        if self.closed || list.id != self.working.id {
            return false;
        }
        if self.is_dirty() {
            warn!(list_id = %list.id, "remote update overwrote unsaved edits");
        }
        report_duplicate_ids(&list);
        self.working = list.clone();
        self.baseline = list;
        self.epoch += 1;
        debug!(list_id = %self.working.id, epoch = self.epoch, "applied remote snapshot");
        true
    }

    /// Drain the push channel; returns how many snapshots were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.channel.poll() {
            match event {
                ChannelEvent::ListUpdated(list) => {
                    if self.apply_remote(list) {
                        applied += 1;
                    }
                }
            }
        }
        applied
    }

    /// Adopt `saved` as the baseline while keeping local edits. Server-owned
    /// timestamps are copied into the working copy.
    fn rebase(&mut self, saved: TodoList) {
        self.working.created_at = saved.created_at;
        self.working.updated_at = saved.updated_at;
        self.baseline = saved;
    }
}
