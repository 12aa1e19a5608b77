//! Command implementations. Output goes to the supplied writer.

use std::io::Write;

use anyhow::Context;

use cms_core::types::ModalId;
use cms_drafts::DraftStore;
use cms_modal::ModalTray;

use crate::cli::Command;

pub fn run(command: &Command, drafts: &DraftStore, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::List { namespace } => {
            let records = drafts.get_all_drafts(*namespace);
            if records.is_empty() {
                writeln!(out, "No drafts")?;
            }
            for record in &records {
                let summary = drafts.get_draft_summary(record);
                let mode = if summary.is_edit { "edit" } else { "create" };
                writeln!(
                    out,
                    "{} {}  {:<16} {:<6} {}  {}",
                    summary.date, summary.time, record.namespace, mode, summary.modal_id, summary.title
                )?;
                if !summary.summary.is_empty() {
                    writeln!(out, "    {}", summary.summary)?;
                }
            }
        }
        Command::Show {
            namespace,
            modal_id,
        } => {
            let id = ModalId::new(modal_id.as_str());
            let record = drafts
                .load_draft(&id, *namespace)
                .with_context(|| format!("No {namespace} draft with id {modal_id}"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
        }
        Command::Delete {
            namespace,
            modal_id,
        } => {
            drafts.delete_draft(&ModalId::new(modal_id.as_str()), *namespace);
            tracing::info!(namespace = %namespace, modal_id = %modal_id, "Deleted draft");
            writeln!(out, "Deleted {namespace} draft {modal_id}")?;
        }
        Command::ClearUnsaved { namespace } => {
            let cleared = ModalTray::load(drafts.clone(), *namespace).clear_unsaved();
            writeln!(out, "Cleared {cleared} unsaved {namespace} item(s)")?;
        }
        Command::ClearAll { namespace } => {
            let cleared = ModalTray::load(drafts.clone(), *namespace).clear_all();
            writeln!(out, "Cleared {cleared} {namespace} item(s)")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_core::entity_kind::EntityKind;
    use serde_json::json;

    fn open(dir: &tempfile::TempDir) -> DraftStore {
        crate::open_store(&dir.path().join("drafts.json")).unwrap()
    }

    fn run_to_string(command: Command, drafts: &DraftStore) -> String {
        let mut out = Vec::new();
        run(&command, drafts, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn list_prints_title_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let drafts = open(&dir);
        let payload = json!({"title": {"en": "", "per": "Dari heading", "ps": ""}});
        drafts.save_draft(
            &ModalId::new("news-modal-1"),
            payload.as_object().unwrap(),
            true,
            EntityKind::News,
        );

        let out = run_to_string(Command::List { namespace: None }, &drafts);
        assert!(out.contains("news-modal-1"));
        assert!(out.contains("edit"));
        assert!(out.contains("Dari heading"));

        let out = run_to_string(
            Command::List {
                namespace: Some(EntityKind::Faqs),
            },
            &drafts,
        );
        assert_eq!(out.trim(), "No drafts");
    }

    #[test]
    fn show_missing_draft_fails() {
        let dir = tempfile::tempdir().unwrap();
        let drafts = open(&dir);
        let command = Command::Show {
            namespace: EntityKind::Events,
            modal_id: "missing".into(),
        };
        assert!(run(&command, &drafts, &mut Vec::new()).is_err());
    }

    #[test]
    fn delete_and_clear_persist_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let drafts = open(&dir);
        for id in ["a", "b"] {
            drafts.save_draft(&ModalId::new(id), &Default::default(), false, EntityKind::Events);
        }
        let saved = json!({"_id": "srv-1"});
        drafts.save_draft(&ModalId::new("c"), saved.as_object().unwrap(), true, EntityKind::Events);

        run_to_string(
            Command::Delete {
                namespace: EntityKind::Events,
                modal_id: "a".into(),
            },
            &drafts,
        );
        let out = run_to_string(
            Command::ClearUnsaved {
                namespace: EntityKind::Events,
            },
            &drafts,
        );
        assert!(out.contains("Cleared 1 unsaved"));

        let reopened = open(&dir);
        let ids: Vec<_> = reopened
            .get_all_drafts(Some(EntityKind::Events))
            .into_iter()
            .map(|r| r.modal_id)
            .collect();
        assert_eq!(ids, vec![ModalId::new("c")]);

        let out = run_to_string(
            Command::ClearAll {
                namespace: EntityKind::Events,
            },
            &reopened,
        );
        assert!(out.contains("Cleared 1 events"));
    }
}
