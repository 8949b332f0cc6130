use super::*;
use crate::animation::ease::Ease;
use crate::animation::value::{Property, Value};
use crate::emit::sink::InMemorySink;
use crate::timeline::primitive::{Change, Primitive};

fn fixture() -> (SceneGraph, Animation) {
    let mut g = SceneGraph::new();
    let a = g
        .create_object([(Property::Opacity, Value::Scalar(0.0))])
        .unwrap();
    let anim = Primitive::define(
        &g,
        &[a],
        [(Property::Opacity, Change::To(Value::Scalar(1.0)))],
        1.0,
        Ease::Linear,
    )
    .unwrap()
    .into();
    (g, anim)
}

fn opts(parallel: bool) -> SessionOpts {
    SessionOpts {
        fps: Fps::new(10, 1).unwrap(),
        parallel,
        threads: Some(2),
        chunk_size: 3,
    }
}

#[test]
fn frame_count_includes_the_final_instant() {
    let (g, anim) = fixture();
    let s = TimelineSession::new(&g, &anim, opts(false)).unwrap();
    assert_eq!(s.duration(), 1.0);
    assert_eq!(s.frame_count(), 11);
    assert!(s.render_frame(FrameIndex(11)).is_err());
    assert_eq!(s.render_frame(FrameIndex(10)).unwrap().time, 1.0);
}

#[test]
fn render_all_pushes_frames_in_order() {
    let (g, anim) = fixture();
    let s = TimelineSession::new(&g, &anim, opts(false)).unwrap();
    let mut sink = InMemorySink::new();
    let stats = s.render_all(&mut sink).unwrap();
    assert_eq!(stats.frames_total, 11);
    assert_eq!(sink.config().map(|c| c.frame_count), Some(11));
    let idx: Vec<u64> = sink.frames.iter().map(|(f, _)| f.0).collect();
    assert_eq!(idx, (0..11).collect::<Vec<_>>());
}

#[test]
fn parallel_sampling_matches_sequential() {
    let (g, anim) = fixture();
    let seq = TimelineSession::new(&g, &anim, opts(false)).unwrap();
    let par = TimelineSession::new(&g, &anim, opts(true)).unwrap();
    let mut a = InMemorySink::new();
    let mut b = InMemorySink::new();
    seq.render_all(&mut a).unwrap();
    let stats = par.render_all(&mut b).unwrap();
    assert_eq!(stats.chunks, 4);
    assert_eq!(a.frames, b.frames);
}

#[test]
fn invalid_ranges_and_threads_are_rejected() {
    let (g, anim) = fixture();
    let s = TimelineSession::new(&g, &anim, opts(false)).unwrap();
    let mut sink = InMemorySink::new();
    let empty = FrameRange::new(FrameIndex(2), FrameIndex(2)).unwrap();
    assert!(matches!(
        s.render_range(empty, &mut sink),
        Err(TimeweaveError::Validation(_))
    ));
    let past = FrameRange::new(FrameIndex(0), FrameIndex(12)).unwrap();
    assert!(s.render_range(past, &mut sink).is_err());

    let zero = SessionOpts {
        threads: Some(0),
        ..SessionOpts::default()
    };
    assert!(matches!(
        TimelineSession::new(&g, &anim, zero),
        Err(TimeweaveError::Validation(_))
    ));
}

#[test]
fn zero_chunk_size_still_progresses() {
    let (g, anim) = fixture();
    let s = TimelineSession::new(
        &g,
        &anim,
        SessionOpts {
            chunk_size: 0,
            ..opts(true)
        },
    )
    .unwrap();
    let mut sink = InMemorySink::new();
    let range = FrameRange::new(FrameIndex(3), FrameIndex(6)).unwrap();
    let stats = s.render_range(range, &mut sink).unwrap();
    assert_eq!(stats.frames_total, 3);
    assert_eq!(stats.chunks, 3);
    assert_eq!(sink.frames[0].0, FrameIndex(3));
}
