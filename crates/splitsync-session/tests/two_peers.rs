//! Two sessions wired back to back through in-memory hosts.

use std::time::{Duration, Instant};

use splitsync_common::{HostEvent, SessionId};
use splitsync_layout::{
    infer, Extent, HostAdapter, LayoutNode, MemoryHost, Orientation, SIZE_TOLERANCE,
};
use splitsync_session::{IgnoreList, Message, Payload, SessionOptions, SyncSession};

const COOLDOWN: Duration = Duration::from_millis(100);

fn host() -> MemoryHost {
    MemoryHost::new(Extent::new(120, 40))
}

fn session() -> SyncSession {
    SyncSession::new(SessionOptions {
        echo_cooldown: COOLDOWN,
        ..SessionOptions::default()
    })
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Three panes: main.rs | lib.rs over notes.md
fn arrange(host: &mut MemoryHost) {
    host.open_in_focused("main.rs").unwrap();
    host.split_focused(Orientation::SideBySide).unwrap();
    host.open_in_focused("lib.rs").unwrap();
    host.split_focused(Orientation::Stacked).unwrap();
    host.open_in_focused("notes.md").unwrap();
}

fn structure(host: &MemoryHost) -> LayoutNode {
    infer(&host.list_window_rects())
}

#[test]
fn layout_is_mirrored() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    let t0 = Instant::now();

    let bytes = a.local_sync(&mut ha, t0).expect("first sync is always sent");
    let summary = b.receive(&bytes, &mut hb, t0);

    assert_eq!(summary.applied, 1);
    assert!(summary.frame_errors.is_empty());
    assert_eq!(hb.list_windows().len(), 3);
    assert!(structure(&hb).same_shape(&structure(&ha)));

    let shown: Vec<Option<String>> = hb
        .list_window_rects()
        .into_iter()
        .map(|r| r.buffer_path)
        .collect();
    assert_eq!(
        shown,
        vec![
            Some("main.rs".to_string()),
            Some("lib.rs".to_string()),
            Some("notes.md".to_string()),
        ]
    );
}

#[test]
fn unchanged_layout_is_not_resent() {
    let mut a = session();
    let mut ha = host();
    arrange(&mut ha);
    let t0 = Instant::now();

    assert!(a.local_sync(&mut ha, t0).is_some());
    assert!(a.local_sync(&mut ha, t0 + ms(500)).is_none());

    ha.move_cursor(12, 3).unwrap();
    assert!(a.local_sync(&mut ha, t0 + ms(600)).is_some());
}

#[test]
fn echo_guard_drops_then_allows_one() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    let t0 = Instant::now();

    let bytes = a.local_sync(&mut ha, t0).unwrap();
    b.receive(&bytes, &mut hb, t0);

    // Applying the inbound layout changed hb, but nothing goes back.
    assert!(b.local_sync(&mut hb, t0 + ms(10)).is_none());

    // A genuine local change inside the cool-down is dropped, not queued.
    hb.focus_nth(0).unwrap();
    assert!(b.local_sync(&mut hb, t0 + ms(50)).is_none());

    // Exactly one send once the cool-down has elapsed.
    assert!(b.local_sync(&mut hb, t0 + COOLDOWN).is_some());
    assert!(b.local_sync(&mut hb, t0 + COOLDOWN + ms(1)).is_none());
}

#[test]
fn cooldown_starts_when_applying_finishes() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    let t0 = Instant::now();
    let bytes = a.local_sync(&mut ha, t0).unwrap();

    // Applying took 300 ms; the clock is only read once it is done.
    let mut reads = 0;
    let summary = b.receive_with_clock(&bytes, &mut hb, || {
        reads += 1;
        t0 + ms(300)
    });

    assert_eq!(summary.applied, 1);
    assert_eq!(reads, 1);
    assert!(b.is_suppressed(t0 + ms(300) + COOLDOWN - ms(1)));
    assert!(!b.is_suppressed(t0 + ms(300) + COOLDOWN));
}

#[test]
fn adopted_snapshot_prevents_bounce_after_cooldown() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    let t0 = Instant::now();

    let bytes = a.local_sync(&mut ha, t0).unwrap();
    b.receive(&bytes, &mut hb, t0);
    assert!(b.local_sync(&mut hb, t0 + ms(1000)).is_none());
}

#[test]
fn round_trip_settles() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    let t0 = Instant::now();

    let to_b = a.local_sync(&mut ha, t0).unwrap();
    b.receive(&to_b, &mut hb, t0);

    hb.split_focused(Orientation::SideBySide).unwrap();
    let to_a = b.local_sync(&mut hb, t0 + ms(200)).unwrap();
    a.receive(&to_a, &mut ha, t0 + ms(200));

    assert_eq!(ha.list_windows().len(), 4);
    assert!(structure(&ha).same_layout(&structure(&hb), SIZE_TOLERANCE));
    assert!(a.local_sync(&mut ha, t0 + ms(1000)).is_none());
    assert!(b.local_sync(&mut hb, t0 + ms(1000)).is_none());
}

#[test]
fn own_messages_are_dropped() {
    let mut a = session();
    let mut ha = host();
    arrange(&mut ha);
    let t0 = Instant::now();

    let bytes = a.local_sync(&mut ha, t0).unwrap();
    let before = ha.list_window_rects();
    let summary = a.receive(&bytes, &mut ha, t0);

    assert_eq!(summary.echoes, 1);
    assert_eq!(summary.applied, 0);
    assert_eq!(ha.list_window_rects(), before);
    assert!(!a.is_suppressed(t0));
}

#[test]
fn malformed_frame_then_valid_frame() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    let t0 = Instant::now();

    let mut bytes = b"{\"kind\":\0".to_vec();
    bytes.extend_from_slice(&a.local_sync(&mut ha, t0).unwrap());
    let summary = b.receive(&bytes, &mut hb, t0);

    assert_eq!(summary.frame_errors.len(), 1);
    assert_eq!(summary.applied, 1);
    assert_eq!(hb.list_windows().len(), 3);
}

#[test]
fn frame_split_across_reads() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    let t0 = Instant::now();

    let bytes = a.local_sync(&mut ha, t0).unwrap();
    let (head, tail) = bytes.split_at(10);
    assert_eq!(b.receive(head, &mut hb, t0).applied, 0);
    assert_eq!(b.pending_bytes(), 10);
    assert_eq!(b.receive(tail, &mut hb, t0).applied, 1);
    assert_eq!(b.pending_bytes(), 0);
    assert!(b.finish().is_none());
}

#[test]
fn truncated_stream_is_reported() {
    let mut b = session();
    let mut hb = host();
    b.receive(b"{\"kind\":\"LayoutSync\"", &mut hb, Instant::now());
    assert!(b.finish().is_some());
}

#[test]
fn legacy_buffer_and_view_messages() {
    let peer = SessionId::new();
    let mut b = session();
    let mut hb = host();
    let t0 = Instant::now();

    let open = Message::new(
        Payload::BufferChanged {
            path: "main.rs".into(),
        },
        &peer,
    );
    let mut bytes = open.to_json().unwrap();
    bytes.push(0);
    let view = br#"{"kind":"ViewChanged","payload":{"path":"main.rs","viewState":{"cursorLine":9,"cursorChar":4,"scrollTopLine":2,"scrollBottomLine":41}}}"#;
    bytes.extend_from_slice(view);
    bytes.push(0);

    let summary = b.receive(&bytes, &mut hb, t0);
    assert_eq!(summary.applied, 2);

    let rect = &hb.list_window_rects()[0];
    assert_eq!(rect.buffer_path.as_deref(), Some("main.rs"));
    assert_eq!(rect.view_state.map(|v| v.cursor_line), Some(9));
}

#[test]
fn ignored_paths_are_not_sent_or_applied() {
    let options = SessionOptions {
        echo_cooldown: COOLDOWN,
        ignore: IgnoreList::new(&[r"\.log$"]).unwrap(),
        ..SessionOptions::default()
    };
    let mut a = SyncSession::new(options.clone());
    let mut b = SyncSession::new(options);
    let (mut ha, mut hb) = (host(), host());
    ha.open_in_focused("main.rs").unwrap();
    ha.open_in_focused("build.log").unwrap();
    let t0 = Instant::now();

    let bytes = a.local_sync(&mut ha, t0).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(!text.contains("build.log"));

    b.receive(&bytes, &mut hb, t0);
    assert_eq!(hb.list_open_paths(), vec!["main.rs".to_string()]);
}

#[test]
fn unreadable_file_is_reported_not_fatal() {
    let (mut a, mut b) = (session(), session());
    let (mut ha, mut hb) = (host(), host());
    arrange(&mut ha);
    hb.mark_unreadable("lib.rs");
    let t0 = Instant::now();

    let bytes = a.local_sync(&mut ha, t0).unwrap();
    let summary = b.receive(&bytes, &mut hb, t0);

    assert_eq!(summary.reports[0].buffer_failures.len(), 1);
    assert_eq!(hb.list_windows().len(), 3);
    assert!(!hb.notifications().is_empty());
}

#[test]
fn events_drive_outbound_sync() {
    let mut a = session();
    let mut ha = host();
    arrange(&mut ha);
    let t0 = Instant::now();

    assert!(a.handle_event(&HostEvent::Shutdown, &mut ha, t0).is_none());
    assert!(a.handle_event(&HostEvent::LayoutChanged, &mut ha, t0).is_some());
    assert!(a.handle_event(&HostEvent::FocusChanged, &mut ha, t0).is_none());
}
