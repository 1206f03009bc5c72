use super::*;
use crate::catalog::{ConfirmGate, PlayableTrack, Track, TrackId};
use std::ffi::OsStr;
use std::path::PathBuf;

fn t(id: i64) -> PlayableTrack {
    PlayableTrack::from(Track {
        id: TrackId::Number(id),
        name: None,
        title: Some(format!("Song {id}")),
        file_path: format!("uploads/{id}.mp3"),
        created_at: None,
        length_minutes: None,
    })
}

#[test]
fn next_prev_wrap_around() {
    let mut app = App::new("http://localhost".into());
    app.next(3);
    app.next(3);
    assert_eq!(app.cursor, 2);
    app.next(3);
    assert_eq!(app.cursor, 0);
    app.prev(3);
    assert_eq!(app.cursor, 2);

    app.next(0);
    assert_eq!(app.cursor, 0);
}

#[test]
fn clamp_cursor_follows_shrinking_catalog() {
    let mut app = App::new(String::new());
    app.bottom(5);
    assert_eq!(app.cursor, 4);

    app.clamp_cursor(2);
    assert_eq!(app.cursor, 1);
    app.clamp_cursor(0);
    assert_eq!(app.cursor, 0);

    let tracks = vec![t(1), t(2)];
    app.cursor = 1;
    assert_eq!(app.highlighted(&tracks).map(|t| t.id().clone()), Some(TrackId::Number(2)));
}

#[test]
fn upload_prompt_is_gated_while_uploading() {
    let mut app = App::new(String::new());
    assert!(!app.open_upload_prompt(true));
    assert_eq!(app.mode, Mode::Normal);

    assert!(app.open_upload_prompt(false));
    for c in "/tmp/a.mp3".chars() {
        app.push_prompt_char(c);
    }
    app.push_prompt_char('x');
    app.pop_prompt_char();
    assert_eq!(app.submit_upload_prompt(), Some(PathBuf::from("/tmp/a.mp3")));
    assert_eq!(app.mode, Mode::Normal);
}

#[test]
fn blank_upload_prompt_selects_nothing() {
    let mut app = App::new(String::new());
    app.open_upload_prompt(false);
    app.push_prompt_char(' ');
    assert_eq!(app.submit_upload_prompt(), None);
    assert_eq!(app.mode, Mode::Normal);
}

#[test]
fn upload_path_strips_whitespace_and_quotes() {
    assert_eq!(
        parse_upload_path_with_home("  '/music/my song.mp3' ", None),
        Some(PathBuf::from("/music/my song.mp3"))
    );
    assert_eq!(
        parse_upload_path_with_home("\"/music/a.flac\"", None),
        Some(PathBuf::from("/music/a.flac"))
    );
    assert_eq!(parse_upload_path_with_home("''", None), None);
}

#[test]
fn upload_path_expands_tilde_against_the_given_home() {
    let home = OsStr::new("/home/listener");
    assert_eq!(
        parse_upload_path_with_home("~/a.mp3", Some(home)),
        Some(PathBuf::from("/home/listener/a.mp3"))
    );
    assert_eq!(
        parse_upload_path_with_home("'~/dir/b c.ogg'", Some(home)),
        Some(PathBuf::from("/home/listener/dir/b c.ogg"))
    );
    // Only a leading `~/` is expanded.
    assert_eq!(
        parse_upload_path_with_home("/x/~/a.mp3", Some(home)),
        Some(PathBuf::from("/x/~/a.mp3"))
    );
    assert_eq!(
        parse_upload_path_with_home("~/a.mp3", None),
        Some(PathBuf::from("~/a.mp3"))
    );
}

#[test]
fn delete_dialog_answer_becomes_the_gate() {
    let mut app = App::new(String::new());
    app.ask_delete(t(5));
    assert!(matches!(app.mode, Mode::ConfirmDelete(_)));

    let (track, answer) = app.answer_delete(false).unwrap();
    assert_eq!(track.id(), &TrackId::Number(5));
    assert!(!answer.confirm(&track));
    assert_eq!(app.mode, Mode::Normal);

    app.ask_delete(t(6));
    let (track, answer) = app.answer_delete(true).unwrap();
    assert!(answer.confirm(&track));

    assert!(app.answer_delete(true).is_none());
}

#[test]
fn metadata_window_toggles() {
    let mut app = App::new(String::new());
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    app.toggle_metadata_window();
    assert!(!app.metadata_window);
}

#[test]
fn closing_the_wrong_dialog_leaves_the_open_one_in_place() {
    let mut app = App::new(String::new());
    app.ask_delete(t(3));
    assert_eq!(app.submit_upload_prompt(), None);
    assert_eq!(app.mode, Mode::ConfirmDelete(t(3)));

    app.answer_delete(false);
    assert!(app.open_upload_prompt(false));
    app.push_prompt_char('x');
    assert!(app.answer_delete(true).is_none());
    assert_eq!(app.mode, Mode::UploadPrompt("x".to_string()));
}
