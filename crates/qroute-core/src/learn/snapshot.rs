use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QTableSnapshot<S> {
    pub schema_version: u32,
    pub state_count: usize,
    pub entry_count: usize,
    pub states: Vec<StateEntrySnapshot<S>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateEntrySnapshot<S> {
    pub state: S,
    pub actions: Vec<ActionValueSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionValueSnapshot {
    pub action_id: usize,
    pub value: f64,
}

impl<S: Serialize> QTableSnapshot<S> {
    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
