/// Frame loop over a finalized schedule.
pub mod timeline_session;
