#![no_std]
#![no_main]

mod gcal;
mod time;
mod wifi;

use core::cell::RefCell;

use display_interface_spi::SPIInterface;
use ds323x::{ic::DS3231, interface::I2cInterface, Ds323x};
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
use embassy_executor::Spawner;
use embassy_net::{
    dns::DnsSocket,
    tcp::client::{TcpClient, TcpClientState},
    StackResources,
};
use embassy_sync::{
    blocking_mutex::{raw::CriticalSectionRawMutex, Mutex as BlockingMutex},
    mutex::Mutex,
};
use embassy_time::Timer;
use epaper_month_calendar::{CalendarConfig, CalendarRenderer};
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    dma::{DmaChannel, DmaPriority, DmaRxBuf, DmaTxBuf},
    dma_buffers,
    gpio::{Input, Level, NoPin, Output, Pull},
    i2c::master::I2c,
    rng::Rng,
    spi::master::{Config, Spi, SpiDmaBus},
    timer::timg::TimerGroup,
    Async, Blocking,
};
use esp_hal_embassy::main;
use esp_wifi::{wifi::WifiStaDevice, EspWifiController};
use log::{error, info};
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use static_cell::{ConstStaticCell, StaticCell};
use weact_studio_epd::{
    graphics::{Display290TriColor, DisplayRotation},
    TriColor, WeActStudio290TriColorDriver,
};

extern crate alloc;

use crate::gcal::GoogleCalendarSource;

pub type SpiBusMutex = Mutex<CriticalSectionRawMutex, SpiDmaBus<'static, Async>>;
pub type Ds323xTypeConcrete = Ds323x<I2cInterface<I2c<'static, Blocking>>, DS3231>;
pub type RtcDs323x = BlockingMutex<CriticalSectionRawMutex, RefCell<Ds323xTypeConcrete>>;

const TLS_BUFFER_SIZE: usize = 16640;

static TLS_READ_BUFFER: ConstStaticCell<[u8; TLS_BUFFER_SIZE]> =
    ConstStaticCell::new([0; TLS_BUFFER_SIZE]);
static TLS_WRITE_BUFFER: ConstStaticCell<[u8; TLS_BUFFER_SIZE]> =
    ConstStaticCell::new([0; TLS_BUFFER_SIZE]);
static HTTP_RX_BUFFER: ConstStaticCell<[u8; 8192]> = ConstStaticCell::new([0; 8192]);

fn calendar_config() -> CalendarConfig<TriColor> {
    let mut config = CalendarConfig::new(
        TriColor::White,
        TriColor::Black,
        TriColor::Red,
        TriColor::White,
    );
    config.layout.font = &profont::PROFONT_9_POINT;
    config
}

#[main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init({
        let mut config = esp_hal::Config::default();
        config.cpu_clock = CpuClock::max();
        config
    });

    esp_alloc::heap_allocator!(72 * 1024);

    let delay = embassy_time::Delay;

    esp_println::logger::init_logger_from_env();

    let timer0 = TimerGroup::new(peripherals.TIMG1);
    esp_hal_embassy::init(timer0.timer0);

    info!("Embassy initialized!");
    info!("RTC init");

    let i2c = I2c::new(peripherals.I2C0, esp_hal::i2c::master::Config::default())
        .expect("Invalid I2C configuration")
        .with_sda(peripherals.GPIO8)
        .with_scl(peripherals.GPIO9);
    let rtc = Ds323x::new_ds3231(i2c);
    if time::RTC_CLOCK
        .init(BlockingMutex::new(RefCell::new(rtc)))
        .is_err()
    {
        error!("RTC_CLOCK was already set");
    }

    info!("WiFi init");

    let timer1 = TimerGroup::new(peripherals.TIMG0);
    let mut rng = Rng::new(peripherals.RNG);
    let seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());

    let wifi_init = {
        static WIFI_INIT: StaticCell<EspWifiController<'static>> = StaticCell::new();
        WIFI_INIT.init(
            esp_wifi::init(timer1.timer0, rng, peripherals.RADIO_CLK)
                .expect("Failed to initialize wifi"),
        )
    };
    let (wifi_interface, controller) =
        esp_wifi::wifi::new_with_mode(wifi_init, peripherals.WIFI, WifiStaDevice)
            .expect("Failed to create wifi interface");

    let (stack, runner) = {
        static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
        embassy_net::new(
            wifi_interface,
            embassy_net::Config::dhcpv4(Default::default()),
            NET_RESOURCES.init(StackResources::new()),
            seed,
        )
    };

    spawner
        .spawn(wifi::connection_handler_task(controller))
        .expect("Failed to spawn wifi connection task");
    spawner
        .spawn(wifi::net_runner_task(runner))
        .expect("Failed to spawn network runner task");

    info!("Initializing pins");

    let cs = Output::new(peripherals.GPIO5, Level::High);
    let busy_in = Input::new(peripherals.GPIO4, Pull::Up);
    let rst = Output::new(peripherals.GPIO10, Level::High);
    let dc = Output::new(peripherals.GPIO17, Level::Low);

    info!("Initializing spi bus");

    let dma_channel = peripherals.DMA_CH2;
    dma_channel.set_priority(DmaPriority::Priority0);

    let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(32000);
    let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).expect("Invalid DMA rx buffer");
    let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).expect("Invalid DMA tx buffer");

    let spi_bus = {
        static SPI_BUS: StaticCell<SpiBusMutex> = StaticCell::new();

        let spi_dma_bus: SpiDmaBus<'static, Async> =
            Spi::<'static, _>::new(peripherals.SPI2, Config::default())
                .expect("Invalid SPI configuration")
                .with_cs(NoPin)
                .with_miso(NoPin)
                .with_sck(peripherals.GPIO18)
                .with_mosi(peripherals.GPIO21)
                .with_dma(dma_channel)
                .with_buffers(dma_rx_buf, dma_tx_buf)
                .into_async();
        SPI_BUS.init_with(|| Mutex::<CriticalSectionRawMutex, _>::new(spi_dma_bus))
    };

    info!("Initializing spi device");

    let spi_device = SpiDevice::new(spi_bus, cs);
    let spi_interface = SPIInterface::new(spi_device, dc);

    info!("Initializing epd");

    let mut driver = WeActStudio290TriColorDriver::new(spi_interface, busy_in, rst, delay);

    let mut display = Display290TriColor::new();
    display.set_rotation(DisplayRotation::Rotate90);

    info!("Waiting for network");
    stack.wait_config_up().await;
    info!("Network is up");

    let tcp_state = {
        static TCP_STATE: StaticCell<TcpClientState<1, 4096, 4096>> = StaticCell::new();
        TCP_STATE.init(TcpClientState::new())
    };
    let tcp_client = TcpClient::new(stack, tcp_state);
    let dns = DnsSocket::new(stack);
    // reqwless only offers `None` and PSK here, the server certificate is not
    // checked. The client secret and refresh token are exposed to anyone who
    // can intercept the connection, keep the device on a trusted network.
    let tls = TlsConfig::new(
        seed,
        TLS_READ_BUFFER.take(),
        TLS_WRITE_BUFFER.take(),
        TlsVerify::None,
    );
    let mut http_client = HttpClient::new_with_tls(&tcp_client, &dns, tls);
    let mut source = GoogleCalendarSource::new(&mut http_client, HTTP_RX_BUFFER.take());

    let config = calendar_config();
    let renderer = CalendarRenderer::new(&config);

    let mut last_time_sync = None;

    loop {
        let now = match time::local_now() {
            Ok(now) => now,
            Err(_) => {
                time::synchronize_ntp_time_to_rtc(stack).await;
                Timer::after_secs(60).await;
                continue;
            }
        };

        // Keep the RTC from drifting, once a day is plenty
        if last_time_sync != Some(now.date_naive())
            && time::synchronize_ntp_time_to_rtc(stack).await
        {
            last_time_sync = Some(now.date_naive());
        }

        info!("Rendering calendar for {}", now.date_naive());
        match renderer.render(&mut source, &mut display, &now).await {
            Ok(()) => {
                info!("Display full update");
                let updated = async {
                    driver.init().await?;
                    driver.full_update(&display).await?;
                    driver.sleep().await
                }
                .await;
                if let Err(e) = updated {
                    error!("Failed to update display: {e:?}");
                }
            }
            // The previous picture stays on the panel
            Err(e) => error!("Failed to render calendar: {e}"),
        }

        Timer::after(time::until_next_refresh(&now)).await;
    }
}
