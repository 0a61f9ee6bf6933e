//! nRF24L01+ Transceiver Driver (transmit only)
//!
//! Blocking SPI driver with manual chip select. The radio is configured as
//! a primary transmitter with a 32-byte static payload, no auto-ack and no
//! retransmits.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::protocol::{EncodedFrame, ENCODED_FRAME_LEN};
use crate::radio::FrameTransmitter;

/// Register map (subset used here)
mod reg {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
}

/// SPI commands
mod cmd {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const NOP: u8 = 0xFF;
}

/// CONFIG: power up, CRC enabled, 2-byte CRC, PTX
const CONFIG_PTX: u8 = 0b0000_1110;
/// SETUP_AW: 5-byte addresses
const ADDRESS_WIDTH_5: u8 = 0b11;
/// RF_SETUP: 1 Mbps, 0 dBm
const RF_1MBPS_0DBM: u8 = 0b0000_0110;

const STATUS_TX_DS: u8 = 1 << 5;
const STATUS_MAX_RT: u8 = 1 << 4;

/// Status polls before a send is abandoned
const SEND_POLLS: u32 = 100;

/// Transceiver error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioError<E> {
    /// SPI transfer failed
    Spi(E),
    /// CS or CE pin could not be driven
    Pin,
    /// TX_DS never came up
    Timeout,
    /// Retransmit limit reached
    MaxRetries,
}

impl<E> defmt::Format for RadioError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Spi(_) => defmt::write!(f, "Spi"),
            Self::Pin => defmt::write!(f, "Pin"),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::MaxRetries => defmt::write!(f, "MaxRetries"),
        }
    }
}

/// nRF24L01+ in primary transmitter mode
pub struct Nrf24<SPI, CS, CE, D> {
    spi: SPI,
    cs: CS,
    ce: CE,
    delay: D,
}

impl<SPI, CS, CE, D> Nrf24<SPI, CS, CE, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    CE: OutputPin,
    D: DelayNs,
{
    /// Wrap the bus and pins; call [`Self::init`] before sending
    pub fn new(spi: SPI, cs: CS, ce: CE, delay: D) -> Self {
        Self { spi, cs, ce, delay }
    }

    /// Configure address, channel and payload width, then power up
    ///
    /// # Errors
    ///
    /// Returns [`RadioError`] on any bus or pin failure.
    pub fn init(&mut self, address: &[u8; 5], channel: u8) -> Result<(), RadioError<SPI::Error>> {
        self.ce.set_low().map_err(|_| RadioError::Pin)?;
        self.cs.set_high().map_err(|_| RadioError::Pin)?;
        // Power-on reset
        self.delay.delay_ms(5);

        self.write_register(reg::EN_AA, 0x00)?;
        self.write_register(reg::SETUP_RETR, 0x00)?;
        self.write_register(reg::SETUP_AW, ADDRESS_WIDTH_5)?;
        self.write_register(reg::RF_CH, channel & 0x7F)?;
        self.write_register(reg::RF_SETUP, RF_1MBPS_0DBM)?;
        self.write_register_bytes(reg::TX_ADDR, address)?;
        self.write_register_bytes(reg::RX_ADDR_P0, address)?;
        // Payload width register holds at most 32
        self.write_register(reg::RX_PW_P0, ENCODED_FRAME_LEN as u8)?;
        self.command(cmd::FLUSH_TX)?;
        self.write_register(reg::STATUS, STATUS_TX_DS | STATUS_MAX_RT)?;
        self.write_register(reg::CONFIG, CONFIG_PTX)?;

        // Tpd2stby
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Read a register
    ///
    /// # Errors
    ///
    /// Returns [`RadioError`] on any bus or pin failure.
    pub fn read_register(&mut self, register: u8) -> Result<u8, RadioError<SPI::Error>> {
        let mut buf = [cmd::R_REGISTER | register, cmd::NOP];
        self.transfer(&mut buf)?;
        Ok(buf[1])
    }

    /// Transmit one 32-byte payload and wait for completion
    ///
    /// # Errors
    ///
    /// Returns [`RadioError::Timeout`] or [`RadioError::MaxRetries`] when the
    /// radio does not report a completed send.
    pub fn send_payload(&mut self, payload: &[u8; ENCODED_FRAME_LEN]) -> Result<(), RadioError<SPI::Error>> {
        self.command(cmd::FLUSH_TX)?;

        let mut buf = [0u8; ENCODED_FRAME_LEN + 1];
        buf[0] = cmd::W_TX_PAYLOAD;
        buf[1..].copy_from_slice(payload);
        self.transfer(&mut buf)?;

        // CE pulse >= 10 us starts the transmission
        self.ce.set_high().map_err(|_| RadioError::Pin)?;
        self.delay.delay_us(15);
        self.ce.set_low().map_err(|_| RadioError::Pin)?;

        for _ in 0..SEND_POLLS {
            let status = self.command(cmd::NOP)?;
            if status & STATUS_TX_DS != 0 {
                self.write_register(reg::STATUS, STATUS_TX_DS)?;
                return Ok(());
            }
            if status & STATUS_MAX_RT != 0 {
                self.write_register(reg::STATUS, STATUS_MAX_RT)?;
                self.command(cmd::FLUSH_TX)?;
                return Err(RadioError::MaxRetries);
            }
            self.delay.delay_us(100);
        }
        self.command(cmd::FLUSH_TX)?;
        Err(RadioError::Timeout)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), RadioError<SPI::Error>> {
        self.transfer(&mut [cmd::W_REGISTER | register, value])
    }

    fn write_register_bytes(&mut self, register: u8, data: &[u8; 5]) -> Result<(), RadioError<SPI::Error>> {
        let mut buf = [0u8; 6];
        buf[0] = cmd::W_REGISTER | register;
        buf[1..].copy_from_slice(data);
        self.transfer(&mut buf)
    }

    /// Single-byte command, returns STATUS
    fn command(&mut self, command: u8) -> Result<u8, RadioError<SPI::Error>> {
        let mut buf = [command];
        self.transfer(&mut buf)?;
        Ok(buf[0])
    }

    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), RadioError<SPI::Error>> {
        self.cs.set_low().map_err(|_| RadioError::Pin)?;
        let result = self
            .spi
            .transfer_in_place(buf)
            .and_then(|()| self.spi.flush())
            .map_err(RadioError::Spi);
        self.cs.set_high().map_err(|_| RadioError::Pin)?;
        result
    }
}

impl<SPI, CS, CE, D> FrameTransmitter for Nrf24<SPI, CS, CE, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    CE: OutputPin,
    D: DelayNs,
{
    type Error = RadioError<SPI::Error>;

    fn send(&mut self, frame: &EncodedFrame) -> Result<(), Self::Error> {
        self.send_payload(frame.as_bytes())
    }
}
