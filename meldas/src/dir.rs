//! Directory listing
//!
//! A listing is a two-phase scan: folders first (name and size fields),
//! then files (name, size and comment). The driver keeps an implicit
//! cursor that must be rewound between the two field-selector modes, and
//! again when the scan ends. The final rewind is best-effort, like a
//! file-handle close.

use tracing::debug;

use meldas_core::UnitNo;
use meldas_core::constants::{OWN_UNIT_PREFIX, find_fields};
use meldas_core::fault::{Outcome, classify};
use meldas_types::{DirEntry, EntryKind};

use crate::error::{Error, Result};
use crate::session::{Link, Session};

impl Session {
    /// List folders and files under a controller directory path, e.g.
    /// `M01:\PRG\USER\`. Folders come first, each phase in driver
    /// discovery order.
    ///
    /// A leading `M01:` drive token refers to this session's own unit
    /// and is rewritten to the unit number in two-digit hex.
    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        self.with_session(|link| {
            let path = rewrite_own_unit(path, link.unit);
            let mut entries = Vec::new();
            let result = (|| {
                self.scan_phase(
                    link,
                    &path,
                    find_fields::NAME_SIZE,
                    EntryKind::Folder,
                    &mut entries,
                )?;
                // rewind the cursor before switching field selectors
                self.check(link.driver.reset_dir())?;
                self.scan_phase(link, &path, find_fields::FULL, EntryKind::File, &mut entries)
            })();
            let code = link.driver.reset_dir();
            if code != 0 {
                debug!(
                    address = %self.address(),
                    code = format_args!("0x{code:08X}"),
                    "directory reset fault ignored"
                );
            }
            result.map(|()| entries)
        })
    }

    /// One scan phase: find-first, then find-next until plain success.
    /// Only a data-carrying code continues the loop.
    fn scan_phase(
        &self,
        link: &mut Link,
        path: &str,
        fields: i32,
        kind: EntryKind,
        entries: &mut Vec<DirEntry>,
    ) -> Result<()> {
        let (mut code, mut record) = link.driver.find_first(path, fields);
        loop {
            match classify(code) {
                Outcome::Data(_) => {
                    let entry = DirEntry::parse(kind, &record)
                        .map_err(|err| Error::InvalidResponse(err.to_string()))?;
                    entries.push(entry);
                }
                Outcome::Success => return Ok(()),
                Outcome::Fault(fault) => return Err(self.fault_error(fault)),
            }
            (code, record) = link.driver.find_next();
        }
    }
}

fn rewrite_own_unit(path: &str, unit: UnitNo) -> String {
    match path.strip_prefix(OWN_UNIT_PREFIX) {
        Some(rest) => format!("M{}:{rest}", unit.to_hex()),
        None => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use meldas_driver::{FailPoint, SimController};
    use meldas_types::EntryKind;
    use pretty_assertions::assert_eq;

    use crate::Hub;

    fn sim_hub() -> (SimController, Hub) {
        let sim = SimController::new();
        let hub = {
            let sim = sim.clone();
            Hub::new(move |_| Box::new(sim.driver()))
        };
        (sim, hub)
    }

    const DIR: &str = "M01:\\PRG\\USER\\";

    fn seed(sim: &SimController, dir: &str) {
        sim.add_folder(dir, "FIXTURES", 4096);
        sim.add_folder(dir, "PARTS", 2048);
        sim.add_dir_file(dir, "100", 19, Some("BY IKEHARA"));
        sim.add_dir_file(dir, "200", 1500, None);
        sim.add_dir_file(dir, "300", 1234567, Some("ROUGHING"));
    }

    #[test]
    fn lists_folders_first_in_discovery_order() {
        let (sim, hub) = sim_hub();
        seed(&sim, DIR);
        let session = hub.session("10.0.0.5:683").unwrap();
        let entries = session.list_dir(DIR).unwrap();

        assert_eq!(entries.len(), 5);
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.kind, e.name.as_str(), e.size.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (EntryKind::Folder, "FIXTURES", "4,096"),
                (EntryKind::Folder, "PARTS", "2,048"),
                (EntryKind::File, "100", "19"),
                (EntryKind::File, "200", "1,500"),
                (EntryKind::File, "300", "1,234,567"),
            ]
        );
        assert_eq!(entries[2].comment.as_deref(), Some("BY IKEHARA"));
        assert_eq!(entries[3].comment, None);
    }

    #[test]
    fn empty_directories_list_cleanly() {
        let (sim, hub) = sim_hub();
        sim.add_dir(DIR);
        let session = hub.session("10.0.0.5:683").unwrap();
        assert_eq!(session.list_dir(DIR).unwrap(), vec![]);
    }

    #[test]
    fn missing_directories_fault() {
        let (_sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        let err = session.list_dir(DIR).unwrap_err();
        assert_eq!(err.fault_code(), Some(0x8003_0191));
    }

    #[test]
    fn own_unit_prefix_is_rewritten_to_the_session_unit() {
        let (sim, hub) = sim_hub();
        // the first session takes unit 1; the one under test gets unit 2,
        // so its M01: paths must go out as M02:
        let parked = hub.session("10.0.0.4:683").unwrap();
        parked.magazine_size().unwrap();

        seed(&sim, "M02:\\PRG\\USER\\");
        let session = hub.session("10.0.0.5:683").unwrap();
        let entries = session.list_dir(DIR).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(sim.last_find_path().as_deref(), Some("M02:\\PRG\\USER\\"));
    }

    #[test]
    fn foreign_drive_paths_are_left_alone() {
        let (sim, hub) = sim_hub();
        seed(&sim, "D01:\\PRG\\");
        let session = hub.session("10.0.0.5:683").unwrap();
        session.list_dir("D01:\\PRG\\").unwrap();
        assert_eq!(sim.last_find_path().as_deref(), Some("D01:\\PRG\\"));
    }

    #[test]
    fn a_failing_mid_scan_reset_propagates() {
        let (sim, hub) = sim_hub();
        seed(&sim, DIR);
        let session = hub.session("10.0.0.5:683").unwrap();
        sim.inject_fault(FailPoint::ResetDir, 0x8007_0B90);
        let err = session.list_dir(DIR).unwrap_err();
        assert_eq!(err.fault_code(), Some(0x8007_0B90));
    }

    #[test]
    fn a_failing_final_reset_is_suppressed() {
        let (sim, hub) = sim_hub();
        seed(&sim, DIR);
        let session = hub.session("10.0.0.5:683").unwrap();
        // let the checked mid-scan reset through; fail the trailing one
        sim.inject_fault_after(FailPoint::ResetDir, 0x8007_0B90, 1);
        let entries = session.list_dir(DIR).unwrap();
        assert_eq!(entries.len(), 5);
    }
}
