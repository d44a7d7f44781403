// Standard metadata field names
//
// Maps the friendly names used by the CLI and the `Metadata` summary
// (title, artist, year, ...) onto Vorbis comment keys. Anything that is not
// a standard field is passed through as a raw Vorbis key.

use std::str::FromStr;

use crate::flac::VorbisFields;

/// Standard metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardField {
    Title,
    Artist,
    Album,
    Year,
    Track,
    Genre,
    Comment,
    Lyrics,
}

impl StandardField {
    pub const ALL: [StandardField; 8] = [
        StandardField::Title,
        StandardField::Artist,
        StandardField::Album,
        StandardField::Year,
        StandardField::Track,
        StandardField::Genre,
        StandardField::Comment,
        StandardField::Lyrics,
    ];

    /// Get standard field name (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardField::Title => "title",
            StandardField::Artist => "artist",
            StandardField::Album => "album",
            StandardField::Year => "year",
            StandardField::Track => "track",
            StandardField::Genre => "genre",
            StandardField::Comment => "comment",
            StandardField::Lyrics => "lyrics",
        }
    }

    /// Vorbis comment key that stores this field
    pub fn vorbis_key(&self) -> &'static str {
        match self {
            StandardField::Title => VorbisFields::TITLE,
            StandardField::Artist => VorbisFields::ARTIST,
            StandardField::Album => VorbisFields::ALBUM,
            StandardField::Year => VorbisFields::DATE,
            StandardField::Track => VorbisFields::TRACKNUMBER,
            StandardField::Genre => VorbisFields::GENRE,
            StandardField::Comment => VorbisFields::COMMENT,
            StandardField::Lyrics => VorbisFields::LYRICS,
        }
    }
}

impl FromStr for StandardField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(StandardField::Title),
            "artist" => Ok(StandardField::Artist),
            "album" => Ok(StandardField::Album),
            "year" | "date" => Ok(StandardField::Year),
            "track" | "tracknumber" => Ok(StandardField::Track),
            "genre" => Ok(StandardField::Genre),
            "comment" => Ok(StandardField::Comment),
            "lyrics" => Ok(StandardField::Lyrics),
            _ => Err(()),
        }
    }
}

/// Resolve a user-supplied field name to the Vorbis key to read or write
pub fn to_vorbis_key(name: &str) -> String {
    match name.parse::<StandardField>() {
        Ok(field) => field.vorbis_key().to_string(),
        Err(()) => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_names_map_to_vorbis_keys() {
        assert_eq!(to_vorbis_key("year"), "DATE");
        assert_eq!(to_vorbis_key("Track"), "TRACKNUMBER");
        assert_eq!(to_vorbis_key("tracknumber"), "TRACKNUMBER");
        assert_eq!(to_vorbis_key("REPLAYGAIN_TRACK_GAIN"), "REPLAYGAIN_TRACK_GAIN");
    }

    #[test]
    fn names_round_trip() {
        for field in StandardField::ALL {
            assert_eq!(field.as_str().parse::<StandardField>(), Ok(field));
        }
    }
}
