#![allow(dead_code)]

// tests/common/mod.rs
use analyzer::domain::Card;
use analyzer::protocol::{Direction, FrameBuilder};
use analyzer::CapturedFrame;

// Logging is auto-installed for every test binary that declares `mod common`
#[ctor::ctor]
fn init_logging() {
    analyzer_test_support::logging::init();
}

/// Wire index of a card token such as `"AS"`.
pub fn idx(token: &str) -> i32 {
    let card: Card = token.parse().expect("valid card token");
    i32::from(card.index())
}

/// Wrap an inner parameter object the way the game server nests it.
pub fn wire(inner: FrameBuilder) -> FrameBuilder {
    FrameBuilder::new()
        .byte("c", 1)
        .short("a", 13)
        .object("p", FrameBuilder::new().string("cmd", "game").object("p", inner))
}

/// Sequential capture with millisecond timestamps 10 apart.
#[derive(Default)]
pub struct Capture {
    frames: Vec<CapturedFrame>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&mut self, bytes: Vec<u8>) -> &mut Self {
        let timestamp = 10 * (self.frames.len() as i64 + 1);
        self.frames.push(CapturedFrame {
            timestamp,
            direction: Direction::Inbound,
            bytes,
        });
        self
    }

    pub fn push(&mut self, inner: FrameBuilder) -> &mut Self {
        self.push_bytes(wire(inner).frame())
    }

    pub fn snapshot(&mut self, counts: [u8; 4], dealer: i8, stage: &str) -> &mut Self {
        self.push(
            FrameBuilder::new()
                .int_array("tc", &[-1, -1, -1, -1])
                .bytes("hc", &counts)
                .byte("dl", dealer)
                .string("st", stage),
        )
    }

    pub fn bid(&mut self, seat: i8, action: &str) -> &mut Self {
        self.push(FrameBuilder::new().string("bd", action).byte("bs", seat))
    }

    pub fn play(&mut self, seat: i8, token: &str) -> &mut Self {
        self.push(FrameBuilder::new().int("cp", idx(token)).byte("ps", seat))
    }

    /// Four plays clockwise from `leader`, then the collect frame.
    pub fn trick(&mut self, leader: i8, tokens: [&str; 4], next: i8, embedded: i8) -> &mut Self {
        for (offset, token) in tokens.iter().enumerate() {
            self.play((leader + offset as i8) % 4, token);
        }
        self.push(
            FrameBuilder::new()
                .byte("eat", 1)
                .byte("mv", next)
                .byte("rs", embedded),
        )
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }
}
