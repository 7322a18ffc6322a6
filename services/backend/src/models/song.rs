use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A schema-less song document. Only the `id` key has meaning to the service.
pub type Song = Map<String, Value>;

/// Name of the application-level key field.
pub const SONG_KEY: &str = "id";

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SongList {
    pub songs: Vec<Song>,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug)]
pub struct SongCount {
    pub count: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct InsertedSong {
    #[serde(rename = "inserted id")]
    pub inserted_id: String,
}

pub fn song_key(song: &Song) -> Option<&Value> {
    song.get(SONG_KEY)
}

/// Key equality with numbers compared by value, so `1` and `1.0` name the
/// same song.
pub fn same_key(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

/// Applies `patch` on top of `target` as a partial update:
/// keys in the patch overwrite, new keys are appended, everything else stays.
/// Returns whether any value actually changed.
pub fn merge_fields(target: &mut Song, patch: &Song) -> bool {
    let mut changed = false;
    for (key, value) in patch {
        match target.get_mut(key) {
            Some(current) if current == value => {}
            Some(current) => {
                *current = value.clone();
                changed = true;
            }
            None => {
                target.insert(key.clone(), value.clone());
                changed = true;
            }
        }
    }
    changed
}
