//! Common test utilities for integration tests
//!
//! This module provides:
//! - A recording board double with a scriptable radio and battery monitor
//! - A clock that shares its tick with the board
//! - Frame inspection helpers

#![allow(dead_code)]

pub mod board;

use std::cell::Cell;
use std::rc::Rc;

use fieldlink_core::{time::Timestamp, DecodedReport, Node, NodeConfig, ReportFrame};

pub use board::{BoardCall, SimBoard, SimClock};

/// Boot a node with `config` on a fresh simulated board at tick 0
pub fn boot(config: NodeConfig) -> (Node<SimBoard>, SimClock) {
    boot_with(config, SimBoard::default())
}

/// Boot a node on a prepared board
pub fn boot_with(config: NodeConfig, mut board: SimBoard) -> (Node<SimBoard>, SimClock) {
    let tick = Rc::new(Cell::new(0));
    board.tick = Rc::clone(&tick);
    let node = Node::new(config, board).expect("valid configuration");
    (node, SimClock { tick })
}

/// Run one pass at `tick`
pub fn poll_at(node: &mut Node<SimBoard>, clock: &SimClock, tick: Timestamp) -> Option<Timestamp> {
    clock.set(tick);
    node.poll(tick)
}

/// Decode every frame the board transmitted
pub fn decoded_frames(node: &Node<SimBoard>) -> Vec<DecodedReport> {
    node.board()
        .frames()
        .map(|bytes| ReportFrame::decode(bytes).expect("well-formed frame"))
        .collect()
}

/// Ticks at which frames were transmitted
pub fn send_times(node: &Node<SimBoard>) -> Vec<Timestamp> {
    node.board()
        .calls
        .iter()
        .filter_map(|call| match call {
            BoardCall::Sent { at, .. } => Some(*at),
            _ => None,
        })
        .collect()
}
