use super::fetch::{clamp_volume, seek_target};
use super::types::PlaybackInfo;
use std::time::Duration;

#[test]
fn seek_target_moves_and_clamps_at_zero() {
    assert_eq!(
        seek_target(Duration::from_millis(12_700), 5),
        Duration::from_secs(17)
    );
    assert_eq!(seek_target(Duration::from_secs(3), -5), Duration::ZERO);
    assert_eq!(seek_target(Duration::ZERO, 0), Duration::ZERO);
}

#[test]
fn clamp_volume_stays_in_unit_range() {
    assert_eq!(clamp_volume(0.5), 0.5);
    assert_eq!(clamp_volume(1.7), 1.0);
    assert_eq!(clamp_volume(-0.2), 0.0);
    assert_eq!(clamp_volume(f32::NAN), 0.0);
}

#[test]
fn playback_info_defaults_to_unbound_full_volume() {
    let info = PlaybackInfo::default();
    assert!(info.key.is_none());
    assert!(!info.playing);
    assert_eq!(info.elapsed, Duration::ZERO);
    assert_eq!(info.volume, 1.0);
}

#[test]
fn player_forwards_bind_and_begin_in_order() {
    use super::{AudioCmd, AudioPlayer};
    use crate::catalog::TrackId;
    use crate::playback::PlaybackResource;

    let (mut player, rx) = AudioPlayer::detached();
    player.bind(&TrackId::Number(1), "/a.mp3");
    player.begin().unwrap();
    player.bind(&TrackId::Number(2), "/b.mp3");
    player.begin().unwrap();

    let cmds: Vec<AudioCmd> = rx.try_iter().collect();
    assert_eq!(cmds.len(), 4);
    assert!(matches!(
        &cmds[2],
        AudioCmd::Load { key: TrackId::Number(2), url } if url == "/b.mp3"
    ));
    assert!(matches!(cmds[3], AudioCmd::Play));
}

#[test]
fn begin_fails_once_the_audio_thread_is_gone() {
    use super::AudioPlayer;
    use crate::catalog::TrackId;
    use crate::playback::{PlaybackError, PlaybackResource};

    let (mut player, rx) = AudioPlayer::detached();
    drop(rx);

    // Binding a dead player is not an error, starting it is.
    player.bind(&TrackId::Number(1), "/a.mp3");
    assert!(matches!(player.begin(), Err(PlaybackError::Disconnected)));
}

#[test]
fn adjust_volume_sends_clamped_value() {
    use super::{AudioCmd, AudioPlayer};

    let (player, rx) = AudioPlayer::detached();
    player.adjust_volume(0.5);

    let cmds: Vec<AudioCmd> = rx.try_iter().collect();
    assert!(matches!(cmds.as_slice(), [AudioCmd::SetVolume(v)] if *v == 1.0));
}

#[test]
fn background_fetch_reports_failure_with_its_generation() {
    use super::fetch::{Fetched, spawn_fetch};
    use crate::playback::PlaybackError;
    use std::net::TcpListener;
    use std::sync::mpsc;

    // Bind then release a port so the connection is refused.
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = reqwest::blocking::Client::builder().build().ok();

    let (tx, rx) = mpsc::channel::<Fetched>();
    spawn_fetch(client, format!("http://{addr}"), "/gone.mp3".into(), 7, tx);

    let fetched = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(fetched.generation, 7);
    assert!(matches!(fetched.result, Err(PlaybackError::Fetch { .. })));
}

#[test]
fn background_fetch_does_not_block_the_caller() {
    use super::fetch::{Fetched, spawn_fetch};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::time::Instant;

    // Accepts connections into its backlog but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
        .ok();

    let (tx, rx) = mpsc::channel::<Fetched>();
    let started = Instant::now();
    spawn_fetch(client, format!("http://{addr}"), "/slow.mp3".into(), 1, tx);
    assert!(started.elapsed() < Duration::from_secs(1));

    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    drop(listener);
}

#[test]
fn quit_returns_promptly_while_a_download_hangs() {
    use super::AudioPlayer;
    use crate::catalog::TrackId;
    use crate::config::AudioSettings;
    use crate::playback::PlaybackResource;
    use std::net::TcpListener;
    use std::time::Instant;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let player = AudioPlayer::new(base_url, AudioSettings::default());
    let mut resource = player.clone();
    resource.bind(&TrackId::Number(1), "/slow.mp3");
    resource.begin().unwrap();
    // Let the audio thread pick up `Play` and start the download.
    std::thread::sleep(Duration::from_millis(200));

    let started = Instant::now();
    player.quit_softly(Duration::ZERO);
    assert!(started.elapsed() < Duration::from_secs(2));
    drop(listener);
}
