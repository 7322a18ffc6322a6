pub mod song;
pub use song::{InsertedSong, SONG_KEY, Song, SongCount, SongList, merge_fields, same_key, song_key};
