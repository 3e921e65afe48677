/// Ordered upload queue
///
/// Picked files are queued as batches and uploaded one at a time, in the
/// order they were picked. The slot a bulk file lands in is resolved only
/// when its upload starts, against the slots as they are at that moment.

use std::collections::VecDeque;
use std::path::PathBuf;

use super::slots::{SlotManager, SLOT_COUNT};

/// Where the files of a batch go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// A single file for a chosen slot
    Target(usize),
    /// Next empty slot at or after the cursor
    Bulk { cursor: usize },
}

#[derive(Debug, Clone)]
struct Batch {
    files: VecDeque<PathBuf>,
    placement: Placement,
}

/// One file on its way to a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub path: PathBuf,
    pub slot: usize,
}

/// What the queue decided when asked for the next job
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub job: Option<UploadJob>,
    /// Files of finished batches that had no empty slot left
    pub dropped: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct UploadQueue {
    batches: VecDeque<Batch>,
    in_flight: Option<UploadJob>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue files picked from a specific slot
    ///
    /// One file goes into that slot; several files are spread like a bulk
    /// upload.
    pub fn enqueue_for_slot(&mut self, slot: usize, files: Vec<PathBuf>) {
        if files.len() == 1 && slot < SLOT_COUNT {
            self.push(files, Placement::Target(slot));
        } else {
            self.enqueue_bulk(files);
        }
    }

    /// Queue files to fill empty slots in ascending order
    pub fn enqueue_bulk(&mut self, files: Vec<PathBuf>) {
        self.push(files, Placement::Bulk { cursor: 0 });
    }

    fn push(&mut self, files: Vec<PathBuf>, placement: Placement) {
        if files.is_empty() {
            return;
        }
        self.batches.push_back(Batch {
            files: files.into(),
            placement,
        });
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&UploadJob> {
        self.in_flight.as_ref()
    }

    /// Files still waiting (not counting the one in flight)
    pub fn pending(&self) -> usize {
        self.batches.iter().map(|b| b.files.len()).sum()
    }

    /// Start the next upload, unless one is already running
    pub fn dispatch(&mut self, slots: &SlotManager) -> Dispatch {
        let mut dispatch = Dispatch::default();
        if self.is_busy() {
            return dispatch;
        }

        while let Some(batch) = self.batches.front_mut() {
            let Some(path) = batch.files.pop_front() else {
                self.batches.pop_front();
                continue;
            };

            let slot = match &mut batch.placement {
                Placement::Target(slot) => Some(*slot),
                Placement::Bulk { cursor } => {
                    let found = slots.first_empty_from(*cursor);
                    if let Some(slot) = found {
                        *cursor = slot + 1;
                    }
                    found
                }
            };

            match slot {
                Some(slot) => {
                    let job = UploadJob { path, slot };
                    self.in_flight = Some(job.clone());
                    dispatch.job = Some(job);
                    return dispatch;
                }
                None => {
                    // No room left for this batch
                    dispatch.dropped.push(path);
                    dispatch.dropped.extend(batch.files.drain(..));
                    self.batches.pop_front();
                }
            }
        }

        dispatch
    }

    /// Mark the running upload as done, whatever its outcome
    pub fn finish(&mut self) -> Option<UploadJob> {
        self.in_flight.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ProcessedPhoto;

    fn files(count: usize) -> Vec<PathBuf> {
        (0..count).map(|i| PathBuf::from(format!("photo_{i}.jpg"))).collect()
    }

    fn photo(name: &str) -> ProcessedPhoto {
        ProcessedPhoto::new(format!("/static/uploads/{name}"), name)
    }

    /// Run the queue to completion, every upload succeeding
    fn drain(queue: &mut UploadQueue, slots: &mut SlotManager) -> (Vec<UploadJob>, Vec<PathBuf>) {
        let mut jobs = Vec::new();
        let mut dropped = Vec::new();
        loop {
            let dispatch = queue.dispatch(slots);
            dropped.extend(dispatch.dropped);
            let Some(job) = dispatch.job else { break };
            slots
                .assign(job.slot, photo(&job.path.to_string_lossy()))
                .unwrap();
            assert_eq!(queue.finish().as_ref(), Some(&job));
            jobs.push(job);
        }
        (jobs, dropped)
    }

    #[test]
    fn test_bulk_fills_min_of_files_and_empty_slots() {
        for occupied in [vec![], vec![0, 1], vec![1, 4, 6], vec![0, 1, 2, 3, 4, 5, 6, 7]] {
            for k in 0..=10 {
                let mut slots = SlotManager::new();
                for &i in &occupied {
                    slots.assign(i, photo(&format!("kept_{i}"))).unwrap();
                }
                let empty: Vec<usize> =
                    (0..SLOT_COUNT).filter(|&i| slots.is_empty_at(i)).collect();

                let mut queue = UploadQueue::new();
                queue.enqueue_bulk(files(k));
                let (jobs, dropped) = drain(&mut queue, &mut slots);

                let filled = k.min(empty.len());
                let used: Vec<usize> = jobs.iter().map(|j| j.slot).collect();
                assert_eq!(used, empty[..filled]);
                assert_eq!(dropped.len(), k.saturating_sub(empty.len()));
                assert_eq!(slots.count_filled(), occupied.len() + filled);
                for &i in &occupied {
                    assert_eq!(slots.get(i).unwrap().processed, format!("kept_{i}"));
                }
            }
        }
    }

    #[test]
    fn test_bulk_keeps_input_order() {
        let mut slots = SlotManager::new();
        slots.assign(0, photo("kept")).unwrap();
        let mut queue = UploadQueue::new();
        queue.enqueue_bulk(files(3));

        let (jobs, _) = drain(&mut queue, &mut slots);
        let order: Vec<_> = jobs.iter().map(|j| (j.path.clone(), j.slot)).collect();
        assert_eq!(
            order,
            vec![
                (PathBuf::from("photo_0.jpg"), 1),
                (PathBuf::from("photo_1.jpg"), 2),
                (PathBuf::from("photo_2.jpg"), 3),
            ]
        );
    }

    #[test]
    fn test_one_upload_in_flight() {
        let slots = SlotManager::new();
        let mut queue = UploadQueue::new();
        queue.enqueue_bulk(files(2));

        let first = queue.dispatch(&slots).job.unwrap();
        assert!(queue.is_busy());
        assert_eq!(queue.dispatch(&slots), Dispatch::default());
        assert_eq!(queue.pending(), 1);

        queue.finish();
        let second = queue.dispatch(&slots).job.unwrap();
        assert_eq!(first.slot, 0);
        // First upload failed, so slot 0 is still empty; the cursor still moves on
        assert_eq!(second.slot, 1);
    }

    #[test]
    fn test_single_file_goes_to_its_slot() {
        let mut slots = SlotManager::new();
        slots.assign(5, photo("old")).unwrap();
        let mut queue = UploadQueue::new();
        queue.enqueue_for_slot(5, files(1));

        let job = queue.dispatch(&slots).job.unwrap();
        assert_eq!(job.slot, 5);
    }

    #[test]
    fn test_several_files_from_a_slot_are_bulk() {
        let mut slots = SlotManager::new();
        slots.assign(0, photo("kept")).unwrap();
        let mut queue = UploadQueue::new();
        queue.enqueue_for_slot(6, files(2));

        let (jobs, _) = drain(&mut queue, &mut slots);
        let used: Vec<usize> = jobs.iter().map(|j| j.slot).collect();
        assert_eq!(used, [1, 2]);
    }

    #[test]
    fn test_batches_run_back_to_back() {
        let mut slots = SlotManager::new();
        let mut queue = UploadQueue::new();
        queue.enqueue_bulk(files(7));
        queue.enqueue_for_slot(0, vec![PathBuf::from("replacement.jpg")]);
        queue.enqueue_bulk(files(3));

        let (jobs, dropped) = drain(&mut queue, &mut slots);
        assert_eq!(jobs.len(), 9);
        assert_eq!(jobs[7].slot, 0);
        assert_eq!(jobs[8].slot, 7);
        assert_eq!(dropped.len(), 2);
        assert!(slots.is_full());
    }
}
