//! ST7796S SPI panel transport
//!
//! 320×480 native-portrait TFT controller in 16-bit (RGB565) mode. Every
//! band transfer is a column/row window followed by a RAM write:
//!
//! ```text
//! CASET x1..x2   RASET y1..y2   RAMWR <pixels>
//! ```
//!
//! Coordinates are big-endian 16-bit start/end pairs, inclusive. Once the
//! pixel write returns, the bytes have left the buffer and the driver
//! reports completion through its [`CompletionNotify`].
//!
//! # Wiring
//!
//! | Signal | Direction |
//! |--------|-----------|
//! | SCK, MOSI | Host → Panel |
//! | DC     | Host → Panel (low = command, high = data) |
//! | CS     | Managed by `SpiDevice` |
//! | RST, BL | Board bring-up, not owned by this driver |

use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};
use platform::{Area, AxisTransform, CompletionNotify, DisplayError, DisplayTransport};

/// MADCTL row address order (mirror Y)
const MADCTL_MY: u8 = 0x80;
/// MADCTL column address order (mirror X)
const MADCTL_MX: u8 = 0x40;
/// MADCTL row/column exchange (swap XY)
const MADCTL_MV: u8 = 0x20;
/// MADCTL BGR element order
const MADCTL_BGR: u8 = 0x08;

/// COLMOD value for 16 bits per pixel on both interfaces
const COLMOD_RGB565: u8 = 0x55;

/// ST7796S command opcodes used by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Command {
    SoftReset = 0x01,
    SleepOut = 0x11,
    InversionOff = 0x20,
    DisplayOn = 0x29,
    ColumnAddressSet = 0x2A,
    RowAddressSet = 0x2B,
    MemoryWrite = 0x2C,
    MemoryAccessControl = 0x36,
    PixelFormat = 0x3A,
}

/// MADCTL byte for an axis transform.
pub fn madctl(transform: AxisTransform, bgr: bool) -> u8 {
    let mut value = 0;
    if transform.mirror_y {
        value |= MADCTL_MY;
    }
    if transform.mirror_x {
        value |= MADCTL_MX;
    }
    if transform.swap_xy {
        value |= MADCTL_MV;
    }
    if bgr {
        value |= MADCTL_BGR;
    }
    value
}

/// ST7796S transport over an async `SpiDevice`.
///
/// `N` is told about every finished RAM write; in firmware this is the
/// pipeline's [`FlushCompletion`](super::FlushCompletion).
pub struct St7796<SPI, DC, N> {
    spi: SPI,
    dc: DC,
    notify: N,
    bgr: bool,
}

impl<SPI, DC, N> St7796<SPI, DC, N>
where
    SPI: SpiDevice,
    DC: OutputPin,
    N: CompletionNotify,
{
    /// Create a transport. Panel colour order defaults to RGB.
    pub fn new(spi: SPI, dc: DC, notify: N) -> Self {
        Self {
            spi,
            dc,
            notify,
            bgr: false,
        }
    }

    /// Use BGR element order for panels wired that way.
    #[must_use]
    pub fn with_bgr(mut self, bgr: bool) -> Self {
        self.bgr = bgr;
        self
    }

    /// Wake the controller and select RGB565.
    ///
    /// Assumes the board has already pulsed RST.
    pub async fn init<D: DelayNs>(
        &mut self,
        delay: &mut D,
        transform: AxisTransform,
    ) -> Result<(), DisplayError> {
        self.send_command(Command::SoftReset).await?;
        delay.delay_ms(120).await;
        self.send_command(Command::SleepOut).await?;
        delay.delay_ms(120).await;
        self.cmd_data(Command::PixelFormat, &[COLMOD_RGB565]).await?;
        self.apply_orientation(transform).await?;
        self.send_command(Command::InversionOff).await?;
        self.send_command(Command::DisplayOn).await?;
        delay.delay_ms(100).await;
        debug!("st7796 initialised, madctl {}", madctl(transform, self.bgr));
        Ok(())
    }

    /// Program scan direction for an orientation's panel transform.
    pub async fn apply_orientation(&mut self, transform: AxisTransform) -> Result<(), DisplayError> {
        let value = madctl(transform, self.bgr);
        self.cmd_data(Command::MemoryAccessControl, &[value]).await
    }

    /// Release the bus and pin.
    pub fn release(self) -> (SPI, DC, N) {
        (self.spi, self.dc, self.notify)
    }

    async fn set_window(&mut self, area: Area) -> Result<(), DisplayError> {
        let [x1h, x1l] = area.x1.to_be_bytes();
        let [x2h, x2l] = area.x2.to_be_bytes();
        self.cmd_data(Command::ColumnAddressSet, &[x1h, x1l, x2h, x2l])
            .await?;
        let [y1h, y1l] = area.y1.to_be_bytes();
        let [y2h, y2l] = area.y2.to_be_bytes();
        self.cmd_data(Command::RowAddressSet, &[y1h, y1l, y2h, y2l])
            .await
    }

    /// DC low, then one command byte.
    async fn send_command(&mut self, cmd: Command) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Gpio)?;
        self.spi
            .write(&[cmd as u8])
            .await
            .map_err(|_| DisplayError::Communication)
    }

    /// DC high, then data bytes.
    async fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.is_empty() {
            return Ok(());
        }
        self.dc.set_high().map_err(|_| DisplayError::Gpio)?;
        self.spi
            .write(data)
            .await
            .map_err(|_| DisplayError::Communication)
    }

    async fn cmd_data(&mut self, cmd: Command, data: &[u8]) -> Result<(), DisplayError> {
        self.send_command(cmd).await?;
        self.send_data(data).await
    }
}

impl<SPI, DC, N> DisplayTransport for St7796<SPI, DC, N>
where
    SPI: SpiDevice,
    DC: OutputPin,
    N: CompletionNotify,
{
    async fn start_transfer(&mut self, area: Area, pixels: &[u8]) -> Result<(), DisplayError> {
        if pixels.len() != area.byte_len() {
            return Err(DisplayError::InvalidBuffer);
        }
        self.set_window(area).await?;
        self.cmd_data(Command::MemoryWrite, pixels).await?;
        self.notify.notify_complete();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    use core::cell::Cell;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use platform::Orientation;

    #[derive(Default)]
    struct CountingNotify(Cell<u32>);

    impl CompletionNotify for CountingNotify {
        fn notify_complete(&self) {
            self.0.set(self.0.get().wrapping_add(1));
        }
    }

    /// TransactionStart + Write(data) + TransactionEnd, one `SpiDevice::write`.
    fn spi_device_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(data.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    fn flatten(writes: &[&[u8]]) -> Vec<SpiTransaction<u8>> {
        writes.iter().flat_map(|w| spi_device_write(w)).collect()
    }

    /// Alternating low/high DC for `n` command+data pairs.
    fn dc_pairs(n: usize) -> PinMock {
        let txns: Vec<PinTransaction> = (0..n)
            .flat_map(|_| {
                [
                    PinTransaction::set(PinState::Low),
                    PinTransaction::set(PinState::High),
                ]
            })
            .collect();
        PinMock::new(&txns)
    }

    #[tokio::test]
    async fn transfer_sets_window_then_writes_pixels() {
        let area = Area::new(256, 30, 257, 30).unwrap();
        let pixels = [0xF8, 0x00, 0x07, 0xE0];
        let mut spi = SpiMock::new(&flatten(&[
            &[0x2A],
            &[0x01, 0x00, 0x01, 0x01],
            &[0x2B],
            &[0x00, 0x1E, 0x00, 0x1E],
            &[0x2C],
            &pixels,
        ]));
        let mut dc = dc_pairs(3);
        let notify = CountingNotify::default();

        let mut panel = St7796::new(spi.clone(), dc.clone(), &notify);
        panel.start_transfer(area, &pixels).await.unwrap();
        assert_eq!(notify.0.get(), 1);

        spi.done();
        dc.done();
    }

    #[tokio::test]
    async fn wrong_length_rejected_before_bus_traffic() {
        let area = Area::new(0, 0, 1, 0).unwrap();
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut dc = PinMock::new(&[]);
        let notify = CountingNotify::default();

        let mut panel = St7796::new(spi.clone(), dc.clone(), &notify);
        let err = panel.start_transfer(area, &[0u8; 3]).await.unwrap_err();
        assert_eq!(err, DisplayError::InvalidBuffer);
        assert_eq!(notify.0.get(), 0);

        spi.done();
        dc.done();
    }

    #[test]
    fn madctl_bits_follow_transform() {
        let landscape = Orientation::Landscape.transform().panel;
        assert_eq!(madctl(landscape, false), MADCTL_MV | MADCTL_MX | MADCTL_MY);
        let inverted = Orientation::InvertedLandscape.transform().panel;
        assert_eq!(madctl(inverted, true), MADCTL_MV | MADCTL_BGR);
        let portrait = Orientation::Portrait.transform().panel;
        assert_eq!(madctl(portrait, false), MADCTL_MY);
    }

    #[tokio::test]
    async fn init_sequence() {
        let transform = Orientation::InvertedLandscape.transform().panel;
        let mut spi = SpiMock::new(&flatten(&[
            &[Command::SoftReset as u8],
            &[Command::SleepOut as u8],
            &[Command::PixelFormat as u8],
            &[COLMOD_RGB565],
            &[Command::MemoryAccessControl as u8],
            &[MADCTL_MV],
            &[Command::InversionOff as u8],
            &[Command::DisplayOn as u8],
        ]));
        let mut dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
        ]);
        let notify = CountingNotify::default();

        let mut panel = St7796::new(spi.clone(), dc.clone(), &notify);
        panel.init(&mut NoopDelay, transform).await.unwrap();

        spi.done();
        dc.done();
    }
}
