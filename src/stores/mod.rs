use std::{collections::HashSet, time::Duration};

use _model::{Region, StoreRecord};
use tracing::{debug, info, warn};

use crate::utils::progress_bar;

use self::driver::{DriverError, PageDriver, RawEntry};

pub mod driver;
pub mod extract;
pub mod getstore;
pub mod replay;

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Collected {
        count: usize,
        skipped: usize,
        duplicates: usize,
    },
    Failed(String),
}

#[derive(Debug)]
pub struct RegionSummary {
    pub region: Region,
    pub outcome: Outcome,
}

/// Records gathered over one run, in collection order.
#[derive(Debug, Default)]
pub struct Collection {
    records: Vec<StoreRecord>,
    seen: HashSet<(String, String, String)>,
    pub summaries: Vec<RegionSummary>,
}

impl Collection {
    pub fn records(&self) -> &[StoreRecord] {
        &self.records
    }

    pub fn failed(&self) -> impl Iterator<Item = &RegionSummary> {
        self.summaries
            .iter()
            .filter(|x| matches!(x.outcome, Outcome::Failed(_)))
    }

    /// Returns how many entries were kept, skipped and already seen.
    fn extend(&mut self, region: Region, entries: &[RawEntry]) -> (usize, usize, usize) {
        let mut count = 0;
        let mut skipped = 0;
        let mut duplicates = 0;

        for entry in entries {
            match extract::extract(entry, region) {
                Ok(Some(record)) => {
                    if self.seen.insert(record.key()) {
                        self.records.push(record);
                        count += 1;
                    } else {
                        duplicates += 1;
                    }
                }
                Ok(None) => skipped += 1,
                Err(e) => {
                    warn!(code = region.code(), entry = ?entry.name, error = %e, "skipping entry");
                    skipped += 1;
                }
            }
        }

        (count, skipped, duplicates)
    }
}

/// Visits each region in order and gathers its stores.
///
/// A region that fails to select or load is logged and skipped after a
/// best-effort reset. Only a fatal driver error ends the run early.
pub fn collect<D: PageDriver>(
    driver: &mut D,
    regions: &[Region],
    load_timeout: Duration,
) -> Result<Collection, DriverError> {
    let mut collection = Collection::default();
    let pb = progress_bar(regions.len() as u64);

    for &region in regions {
        let outcome = match load(driver, region, load_timeout) {
            Ok(entries) => {
                let (count, skipped, duplicates) = collection.extend(region, &entries);
                pb.suspend(|| {
                    info!(
                        code = region.code(),
                        region = %region,
                        count,
                        skipped,
                        duplicates,
                        "collected"
                    )
                });

                if let Err(e) = driver.reset_selection() {
                    if e.is_fatal() {
                        return Err(e);
                    }
                    pb.suspend(|| warn!(code = region.code(), error = %e, "reset failed"));
                }
                Outcome::Collected {
                    count,
                    skipped,
                    duplicates,
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                pb.suspend(|| {
                    warn!(code = region.code(), region = %region, error = %e, "region failed")
                });
                match driver.reset_selection() {
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => debug!(code = region.code(), error = %e, "reset failed"),
                    Ok(()) => {}
                }
                Outcome::Failed(e.to_string())
            }
        };

        collection.summaries.push(RegionSummary { region, outcome });
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        total = collection.records.len(),
        failed = collection.failed().count(),
        "collection finished"
    );
    Ok(collection)
}

fn load<D: PageDriver>(
    driver: &mut D,
    region: Region,
    timeout: Duration,
) -> Result<Vec<RawEntry>, DriverError> {
    driver.select_region(region.code())?;
    driver.select_all_subdivisions()?;
    driver.wait_for_load_complete(timeout)?;
    driver.list_visible_entries()
}
