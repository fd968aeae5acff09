use std::{
    io,
    net::{SocketAddr, UdpSocket},
};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::framedriver::Renderer;
use crate::grid::SimulationGrid;

const UNIVERSE_SIZE: usize = 512;
const CHANNELS_PER_CELL: usize = 3;

/// Sends each frame as one DMX universe to OLA's OSC plugin.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    buffer: Vec<u8>,
    overflow_reported: bool,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr) -> io::Result<Self> {
        let our_addr = SocketAddr::from(([0, 0, 0, 0], 0));
        let sock = UdpSocket::bind(our_addr)?;

        Ok(OlaOutput {
            sock,
            target_addr,
            buffer: vec![0; UNIVERSE_SIZE],
            overflow_reported: false,
        })
    }

    pub fn set(&mut self, channel: usize, value: u8) {
        if let Some(slot) = self.buffer.get_mut(channel) {
            *slot = value;
        }
    }

    pub fn set_rgb(&mut self, start_channel: usize, values: [u8; 3]) {
        for (i, value) in values.into_iter().enumerate() {
            self.set(start_channel + i, value);
        }
    }

    /// Copies the grid row-major into the universe, three channels per cell.
    /// Returns how many cells did not fit.
    pub fn pack(&mut self, grid: &SimulationGrid) -> usize {
        let capacity = UNIVERSE_SIZE / CHANNELS_PER_CELL;
        for (i, cell) in grid.cells().iter().take(capacity).enumerate() {
            self.set_rgb(i * CHANNELS_PER_CELL, [cell.r(), cell.g(), cell.b()]);
        }
        grid.cells().len().saturating_sub(capacity)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        let msg_buf = encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/dmx/universe/0".to_string(),
            args: vec![OscType::Blob(self.buffer.clone())],
        }))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, format!("{err:?}")))?;
        self.sock.send_to(&msg_buf, self.target_addr)?;
        self.blackout();
        Ok(())
    }

    pub fn blackout(&mut self) {
        self.buffer.fill(0);
    }
}

impl Renderer for OlaOutput {
    fn render(&mut self, grid: &SimulationGrid) {
        let dropped = self.pack(grid);
        if dropped > 0 && !self.overflow_reported {
            log::warn!("{dropped} cells do not fit into a DMX universe and are not sent");
            self.overflow_reported = true;
        }

        if let Err(err) = self.flush() {
            log::warn!("Failed to send frame to {}: {err}", self.target_addr);
        }
    }
}
