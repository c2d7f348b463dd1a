use mirror_protocol::{fragments, Command, LineFramer, DEFAULT_FRAGMENT_SIZE};
use proptest::prelude::*;

const PING: &[u8] = b"{\"action\":\"ping\"}\n";

fn feed_all(framer: &mut LineFramer, pieces: &[&[u8]]) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    for piece in pieces {
        framer.feed(piece, |line| lines.push(line.to_vec()));
    }
    lines
}

/// Split `data` at the given (sorted, deduplicated) cut points
fn split_at_points<'a>(data: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for &cut in cuts {
        pieces.push(&data[start..cut]);
        start = cut;
    }
    pieces.push(&data[start..]);
    pieces
}

#[test]
fn ping_in_three_fragments_is_emitted_once_for_every_split() {
    for first in 0..=PING.len() {
        for second in first..=PING.len() {
            let pieces = split_at_points(PING, &[first, second]);
            assert_eq!(pieces.len(), 3);
            assert!(pieces.iter().all(|p| p.len() <= DEFAULT_FRAGMENT_SIZE));

            let mut framer = LineFramer::new();
            let lines = feed_all(&mut framer, &pieces);

            assert_eq!(lines.len(), 1, "split at {first}/{second}");
            assert_eq!(Command::decode(&lines[0]), Ok(Command::Ping));
            assert_eq!(framer.pending(), 0);
        }
    }
}

#[test]
fn outbound_fragments_reassemble_to_the_same_line() {
    let line = b"{\"action\":\"sync_events_ack\",\"count\":4,\"timestamp\":99}\n";
    let mut framer = LineFramer::new();
    let pieces: Vec<&[u8]> = fragments(line, DEFAULT_FRAGMENT_SIZE).collect();
    let lines = feed_all(&mut framer, &pieces);
    assert_eq!(lines, vec![line[..line.len() - 1].to_vec()]);
}

fn line_body() -> impl Strategy<Value = Vec<u8>> {
    // Any bytes except the terminator
    prop::collection::vec(any::<u8>().prop_filter("no terminator", |b| *b != b'\n'), 0..200)
}

proptest! {
    #[test]
    fn any_split_yields_the_line_exactly_once(
        body in line_body(),
        mut cuts in prop::collection::vec(0usize..=200, 0..12),
    ) {
        let mut data = body.clone();
        data.push(b'\n');

        for cut in cuts.iter_mut() {
            *cut = (*cut).min(data.len());
        }
        cuts.sort_unstable();

        let mut framer = LineFramer::new();
        let lines = feed_all(&mut framer, &split_at_points(&data, &cuts));

        prop_assert_eq!(lines, vec![body]);
        prop_assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn coalesced_lines_keep_their_order(
        bodies in prop::collection::vec(line_body(), 1..6),
        fragment_size in 1usize..=64,
    ) {
        let mut stream = Vec::new();
        for body in &bodies {
            stream.extend_from_slice(body);
            stream.push(b'\n');
        }

        let mut framer = LineFramer::new();
        let pieces: Vec<&[u8]> = fragments(&stream, fragment_size).collect();
        let lines = feed_all(&mut framer, &pieces);

        prop_assert_eq!(lines, bodies);
    }

    #[test]
    fn reset_never_leaks_into_the_next_line(
        stale in line_body(),
        fresh_cut in 0usize..=PING.len(),
    ) {
        let mut framer = LineFramer::new();
        feed_all(&mut framer, &[stale.as_slice()]);
        framer.reset();

        let lines = feed_all(&mut framer, &split_at_points(PING, &[fresh_cut]));
        prop_assert_eq!(lines.len(), 1);
        prop_assert_eq!(Command::decode(&lines[0]), Ok(Command::Ping));
    }
}
