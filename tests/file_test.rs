//! File facade and one-shot helpers against temporary files.

use std::path::Path;

use oxiflac::{fast, Error, FlacFile, MetadataChain, OpaqueBlock, StreamInfo, VorbisComment};

const AUDIO: &[u8] = b"\xFF\xF8\x69\x18 pretend audio frames";

/// Helper: write a small FLAC file (metadata + fake audio) and return its bytes.
fn write_flac(path: &Path) -> Vec<u8> {
    let mut comment = VorbisComment::new("reference libFLAC 1.4.3");
    comment.add("ARTIST", "Artist");
    comment.add("TITLE", "Title");
    comment.add("ALBUM", "Album");
    comment.add("TRACKNUMBER", "3");

    let mut chain = MetadataChain::new();
    chain.push(StreamInfo {
        min_block_size: 4096,
        max_block_size: 4096,
        min_frame_size: 0,
        max_frame_size: 0,
        sample_rate: 48_000,
        channels: 2,
        bits_per_sample: 24,
        total_samples: 48_000 * 125,
        md5: [0; 16],
    });
    chain.push(comment);
    chain.push(OpaqueBlock::padding(16));

    let mut bytes = chain.to_bytes().unwrap();
    bytes.extend_from_slice(AUDIO);
    std::fs::write(path, &bytes).unwrap();
    bytes
}

#[test]
fn test_open_reports_audio_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.flac");
    let bytes = write_flac(&path);

    let file = FlacFile::open(&path).unwrap();
    assert_eq!(file.chain().len(), 3);
    assert_eq!(file.audio_offset(), (bytes.len() - AUDIO.len()) as u64);
    assert_eq!(file.duration(), 125);
    assert_eq!(file.stream_info().unwrap().bits_per_sample, 24);
    assert_eq!(file.path(), path.as_path());
}

#[test]
fn test_save_keeps_audio_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.flac");
    write_flac(&path);

    let mut file = FlacFile::open(&path).unwrap();
    let long_title = "x".repeat(1000);
    file.chain_mut().vorbis_comment_mut().set("TITLE", long_title.as_str());
    file.save().unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    assert!(on_disk.ends_with(AUDIO));
    assert_eq!(file.audio_offset(), (on_disk.len() - AUDIO.len()) as u64);

    let reopened = FlacFile::open(&path).unwrap();
    assert_eq!(reopened.vorbis_comment().unwrap().first("title"), long_title);
    assert_eq!(reopened.audio_offset(), file.audio_offset());
}

#[test]
fn test_save_as_switches_path() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.flac");
    let target = dir.path().join("copy.flac");
    let original = write_flac(&source);

    let mut file = FlacFile::open(&source).unwrap();
    file.chain_mut().remove_type(1);
    file.save_as(&target).unwrap();

    assert_eq!(file.path(), target.as_path());
    assert_eq!(std::fs::read(&source).unwrap(), original);

    let copy = FlacFile::open(&target).unwrap();
    assert_eq!(copy.chain().len(), 2);
    assert!(std::fs::read(&target).unwrap().ends_with(AUDIO));
}

#[test]
fn test_fast_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.flac");
    write_flac(&path);

    assert_eq!(fast::get_artist(&path).unwrap(), "Artist");
    assert_eq!(fast::get_title(&path).unwrap(), "Title");
    assert_eq!(fast::get_album(&path).unwrap(), "Album");
    assert_eq!(fast::get_track_number(&path).unwrap(), "3");
    assert_eq!(fast::get_genre(&path).unwrap(), "");
    assert_eq!(fast::get_duration(&path).unwrap(), 125);
    assert_eq!(fast::get_vorbis_field(&path, "artist").unwrap().as_slice(), ["Artist"]);
    assert_eq!(fast::get_stream_info(&path).unwrap().unwrap().sample_rate, 48_000);
    assert_eq!(fast::get_metadata(&path).unwrap().len(), 3);
    assert_eq!(
        fast::get_vorbis_comment(&path).unwrap().unwrap().vendor(),
        "reference libFLAC 1.4.3"
    );
}

#[test]
fn test_open_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.flac");
    assert!(matches!(FlacFile::open(&missing), Err(Error::Io(_))));

    let not_flac = dir.path().join("song.mp3");
    std::fs::write(&not_flac, b"ID3\x04\x00\x00\x00\x00").unwrap();
    assert!(matches!(FlacFile::open(&not_flac), Err(Error::NotAContainer { .. })));
    assert!(fast::get_artist(&not_flac).is_err());
}
