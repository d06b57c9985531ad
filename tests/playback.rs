use std::sync::Arc;

use plectrum::pitch::Pitch;
use plectrum::player::{
    plucked, AsyncPlayer, Callback, Direction, GuitarStrummer, InstrumentPlayer, KeyedPlayer,
    PluckInstrument,
};
use plectrum::render::{render, StreamFiller, StreamState};
use plectrum::signal::{Duration, Frame, Note, SharedNote, Tone};
use plectrum::wav::{encode_wav_16bit, write_source};
use plectrum::Error;

struct Level(f32, Duration);

impl Note for Level {
    fn duration(&self) -> Duration {
        self.1
    }

    fn amplitude(&self, _frame: Frame) -> f32 {
        self.0
    }
}

#[test]
fn test_strum_progression_renders() {
    let mut guitar = GuitarStrummer::new(plucked(8000, 0.3));
    let mut samples = Vec::new();

    for (chord, direction) in [("C", Direction::Down), ("G", Direction::Up), ("Am", Direction::Down)] {
        guitar.strum(chord, direction, 40).unwrap();
        let start = guitar.frame() + 1;
        samples.extend(render_range(&mut guitar, start, 2000));
    }

    assert_eq!(samples.len(), 6000);
    assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    assert!(samples[..2000].iter().any(|s| s.abs() > 0.05));
    // A fresh strum replaces the ringing strings instead of stacking on them
    assert!(guitar.keyed().scheduler().active_count() <= 6);

    let wav = encode_wav_16bit(&samples, 8000).unwrap();
    assert_eq!(wav.len(), 44 + samples.len() * 2);
}

fn render_range<S: plectrum::signal::Source>(source: &mut S, start: Frame, len: Frame) -> Vec<f32> {
    (start..start + len).map(|f| source.sample(f).clamp(-1.0, 1.0)).collect()
}

#[test]
fn test_unknown_chord_leaves_player_untouched() {
    let mut guitar = GuitarStrummer::new(plucked(8000, 0.3));
    guitar.strum_default("E", Direction::Down).unwrap();
    let queued = guitar.keyed().scheduler().queued_count();

    let err = guitar.strum_default("Xm", Direction::Up).unwrap_err();
    assert!(matches!(err, Error::UnknownChord(ref name) if name == "Xm"));
    assert_eq!(guitar.keyed().scheduler().queued_count(), queued);
}

#[test]
fn test_players_share_one_timeline() {
    // Same events through the plain and keyed players give the same output
    let mut plain = AsyncPlayer::new();
    let mut keyed: KeyedPlayer<u8> = KeyedPlayer::new();

    let a: SharedNote = Arc::new(Level(0.25, Duration::Frames(6)));
    let b: SharedNote = Arc::new(Level(0.5, Duration::Infinite));

    plain.play(a.clone());
    plain.queue(3, Callback::Play(b.clone()));
    keyed.play(0, a);
    keyed.queue(3, Callback::Play((1, b)));

    let from_plain = render(&mut plain, Some(10)).unwrap();
    let from_keyed = render(&mut keyed, Some(10)).unwrap();
    assert_eq!(from_plain, from_keyed);
    assert_eq!(
        from_plain,
        vec![0.25, 0.25, 0.25, 0.25, 0.75, 0.75, 0.5, 0.5, 0.5, 0.5]
    );
}

#[test]
fn test_instrument_player_streams() {
    let mut player = InstrumentPlayer::new(PluckInstrument {
        sample_rate: 8000,
        decay_secs: 0.1,
    });
    let e2: Pitch = "E2".parse().unwrap();
    let b3: Pitch = "B3".parse().unwrap();
    player.play(e2, 0.5);
    player.queue(200, Callback::invoke(move |p: &mut KeyedPlayer<Pitch>| p.mute(&e2)));
    player.play(b3, 0.5);

    let mut filler = StreamFiller::new(player);
    let mut buffer = [0.0f32; 64];
    for _ in 0..8 {
        assert_eq!(filler.fill(&mut buffer), StreamState::Continue);
    }

    let keyed = filler.source().keyed();
    assert!(keyed.active_note(&e2).is_none());
    assert!(keyed.is_sounding(&b3));
}

#[test]
fn test_write_source_rejects_players() {
    let path = std::env::temp_dir().join(format!("plectrum_it_{}.wav", std::process::id()));
    let mut guitar = GuitarStrummer::new(plucked(8000, 0.3));
    assert!(matches!(
        write_source(&mut guitar, &path, 8000),
        Err(Error::InfiniteDuration)
    ));
    assert!(!path.exists());

    let mut tone: SharedNote = Arc::new(Tone::new(220.0, 8000, Duration::Frames(800)));
    assert_eq!(write_source(&mut tone, &path, 8000).unwrap(), 800);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 44 + 1600);
    std::fs::remove_file(&path).unwrap();
}
