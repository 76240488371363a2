use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(2, 1).unwrap(),
        frame_interval_ms: 1000,
    }
}

fn frame(w: u32, h: u32) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: vec![255; (w * h * 4) as usize],
        premultiplied: true,
    }
}

#[test]
fn frame_order_rejects_repeats_and_size_mismatch() {
    let mut order = FrameOrder::default();
    let c = cfg();
    order.check(&c, FrameIndex(0), &frame(2, 2)).unwrap();
    order.check(&c, FrameIndex(1), &frame(2, 2)).unwrap();
    assert!(order.check(&c, FrameIndex(1), &frame(2, 2)).is_err());
    assert!(order.check(&c, FrameIndex(2), &frame(4, 2)).is_err());

    let mut bad = frame(2, 2);
    bad.data.pop();
    assert!(order.check(&c, FrameIndex(3), &bad).is_err());
}

#[test]
fn in_memory_sink_records_frames() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(2, 2)).is_err());
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2)).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.frames().len(), 1);
    assert!(sink.is_finished());
}
