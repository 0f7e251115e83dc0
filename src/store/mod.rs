pub mod persist;

pub use persist::{DATA_KEY, FileKv, KvStore, MemKv, PersistError, Snapshot, SnapshotWriter};

use tracing::debug;

use crate::model::{Category, Task};

/// Error type for store mutations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("category not found: {0}")]
    CategoryNotFound(String),
    #[error("\"{0}\" is a reserved category and cannot be renamed")]
    ReservedCategory(String),
}

/// The authoritative owner of the task and category collections. Every
/// mutating operation writes the full snapshot through to persistence;
/// writes are best-effort and never roll back the in-memory change.
#[derive(Debug)]
pub struct Store {
    categories: Vec<Category>,
    tasks: Vec<Task>,
    writer: SnapshotWriter,
}

impl Store {
    /// Open a store over a key-value backend: load whatever is persisted
    /// (empty on first run or malformed data), then hand the backend to the
    /// write-behind worker.
    pub fn open(kv: impl KvStore) -> Store {
        let snapshot = kv
            .get(DATA_KEY)
            .map(|raw| Snapshot::decode(&raw))
            .unwrap_or_default();
        debug!(
            categories = snapshot.categories.len(),
            tasks = snapshot.tasks.len(),
            "opened store"
        );
        Store {
            categories: snapshot.categories,
            tasks: snapshot.tasks,
            writer: SnapshotWriter::spawn(kv),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_named(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_index(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    /// Tasks in one category, in collection order
    pub fn tasks_in<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |t| t.category_id == category_id)
    }

    /// Next free client-side task id: `t<n>` one past the highest numeric
    /// suffix in use
    pub fn next_task_id(&self) -> String {
        let max = self
            .tasks
            .iter()
            .filter_map(|t| t.id.strip_prefix('t'))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("t{}", max + 1)
    }

    /// Insert a new task at the front of the collection, assigning an id if
    /// the draft has none. Optional fields are stored as given; title
    /// validation is the caller's job.
    pub fn create_task(&mut self, mut draft: Task) -> Task {
        if draft.id.is_empty() {
            draft.id = self.next_task_id();
        }
        debug!(id = %draft.id, category = %draft.category_id, "create task");
        self.tasks.insert(0, draft.clone());
        self.persist();
        draft
    }

    /// Replace the task with the same id, or insert it if there is none
    /// (upsert) — new, not-yet-persisted tasks flow through the same save
    /// path as edits.
    pub fn update_task(&mut self, task: Task) -> Task {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) if !task.id.is_empty() => {
                debug!(id = %task.id, "update task");
                *slot = task.clone();
                self.persist();
                task
            }
            _ => self.create_task(task),
        }
    }

    /// Remove a task by id; no-op (and no write) if absent
    pub fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            debug!(id, "delete task");
            self.persist();
        }
    }

    /// Change only the task's category, preserving every other field
    pub fn move_task_to_category(
        &mut self,
        id: &str,
        category_id: &str,
    ) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        task.category_id = category_id.to_string();
        let moved = task.clone();
        debug!(id, category = category_id, "move task");
        self.persist();
        Ok(moved)
    }

    /// Rename a category. Rejected for the reserved names.
    pub fn rename_category(&mut self, id: &str, new_name: &str) -> Result<(), StoreError> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;
        if crate::model::RESERVED_NAMES.contains(&category.name.as_str()) {
            return Err(StoreError::ReservedCategory(category.name.clone()));
        }
        debug!(id, from = %category.name, to = new_name, "rename category");
        category.name = new_name.to_string();
        self.persist();
        Ok(())
    }

    /// Move the category at `from` to position `to`. Out-of-range indices
    /// clamp to the valid range; a same-slot move is a no-op.
    pub fn reorder_categories(&mut self, from: usize, to: usize) {
        if self.categories.is_empty() {
            return;
        }
        let last = self.categories.len() - 1;
        let from = from.min(last);
        let to = to.min(last);
        if from == to {
            return;
        }
        let category = self.categories.remove(from);
        self.categories.insert(to, category);
        debug!(from, to, "reorder categories");
        self.persist();
    }

    /// The current state as one immutable snapshot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            categories: self.categories.clone(),
            tasks: self.tasks.clone(),
        }
    }

    fn persist(&self) {
        self.writer.submit(&self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seeded_store() -> (Store, MemKv) {
        let kv = MemKv::default();
        let seed = Snapshot::default_data().encode().unwrap();
        kv.preload(DATA_KEY, &seed);
        (Store::open(kv.clone()), kv)
    }

    #[test]
    fn open_on_empty_backend_is_empty() {
        let store = Store::open(MemKv::default());
        assert!(store.categories().is_empty());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn open_on_malformed_backend_is_empty() {
        let kv = MemKv::default();
        kv.preload(DATA_KEY, "][ not json");
        let store = Store::open(kv);
        assert!(store.categories().is_empty());
    }

    #[test]
    fn create_assigns_id_and_inserts_at_front() {
        let (mut store, _kv) = seeded_store();
        let created = store.create_task(Task::draft("c2"));
        assert_eq!(created.id, "t3");
        assert_eq!(store.tasks()[0].id, "t3");
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn update_is_an_upsert() {
        let (mut store, _kv) = seeded_store();

        // existing id: replaces in place
        let mut edited = store.task("t1").unwrap().clone();
        edited.title = "Renamed".into();
        store.update_task(edited);
        assert_eq!(store.task("t1").unwrap().title, "Renamed");
        assert_eq!(store.tasks().len(), 2);

        // unknown id: inserted
        let mut fresh = Task::draft("c2");
        fresh.id = "t9".into();
        fresh.title = "New".into();
        store.update_task(fresh);
        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.tasks()[0].id, "t9");
    }

    #[test]
    fn delete_removes_exactly_one_and_leaves_categories() {
        let (mut store, _kv) = seeded_store();
        store.delete_task("t1");
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.categories().len(), 4);

        // absent id is a no-op
        store.delete_task("t1");
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn move_preserves_other_fields() {
        let (mut store, _kv) = seeded_store();
        let before = store.task("t1").unwrap().clone();
        let moved = store.move_task_to_category("t1", "c3").unwrap();
        assert_eq!(moved.category_id, "c3");
        assert_eq!(moved.title, before.title);
        assert_eq!(moved.reminder, before.reminder);
        assert_eq!(
            store.move_task_to_category("nope", "c3"),
            Err(StoreError::TaskNotFound("nope".into()))
        );
    }

    #[test]
    fn rename_rejects_reserved_categories() {
        let (mut store, _kv) = seeded_store();
        assert_eq!(
            store.rename_category("c1", "Stuff"),
            Err(StoreError::ReservedCategory("ToDo".into()))
        );
        assert_eq!(
            store.rename_category("c4", "Archive"),
            Err(StoreError::ReservedCategory("Completed".into()))
        );
        store.rename_category("c3", "Projects").unwrap();
        assert_eq!(store.category("c3").unwrap().name, "Projects");
    }

    #[test]
    fn reorder_is_a_clamped_permutation() {
        let (mut store, _kv) = seeded_store();
        let names = |s: &Store| -> Vec<String> {
            s.categories().iter().map(|c| c.name.clone()).collect()
        };

        store.reorder_categories(1, 3);
        assert_eq!(names(&store), ["ToDo", "School", "Completed", "Work"]);

        // same index: no-op
        store.reorder_categories(2, 2);
        assert_eq!(names(&store), ["ToDo", "School", "Completed", "Work"]);

        // out-of-range clamps instead of panicking
        store.reorder_categories(99, 0);
        assert_eq!(names(&store), ["Work", "ToDo", "School", "Completed"]);

        let mut sorted = names(&store);
        sorted.sort();
        assert_eq!(sorted, ["Completed", "School", "ToDo", "Work"]);
    }

    #[test]
    fn mutations_write_through_to_the_backend() {
        let (mut store, kv) = seeded_store();
        store.rename_category("c3", "Projects").unwrap();
        store.delete_task("t2");
        let expected = store.snapshot();
        drop(store); // joins the writer

        let persisted = Snapshot::decode(&kv.read(DATA_KEY).unwrap());
        assert_eq!(persisted, expected);
        assert_eq!(persisted.categories[2].name, "Projects");
    }
}
