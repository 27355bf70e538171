use embassy_net::Runner;
use embassy_time::Timer;
use esp_wifi::wifi::{
    ClientConfiguration, Configuration, WifiController, WifiDevice, WifiEvent, WifiStaDevice,
    WifiState,
};
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

const SSID: &str = env!("SSID");
const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

/// Keeps the station connected, reconnecting after every drop
#[embassy_executor::task]
pub async fn connection_handler_task(mut controller: WifiController<'static>) {
    info!("Starting wifi connection handler task");
    info!("Device capabilities: {:?}", controller.capabilities());
    loop {
        if esp_wifi::wifi::wifi_state() == WifiState::StaConnected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("Wifi disconnected");
            Timer::after_secs(5).await
        }
        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = Configuration::Client(ClientConfiguration {
                ssid: SSID.try_into().unwrap_or_default(),
                password: WIFI_PASSWORD.try_into().unwrap_or_default(),
                ..Default::default()
            });
            if let Err(e) = controller.set_configuration(&client_config) {
                error!("Invalid wifi configuration: {e:?}");
                Timer::after_secs(5).await;
                continue;
            }
            info!("Starting wifi");
            if let Err(e) = controller.start_async().await {
                error!("Failed to start wifi: {e:?}");
                Timer::after_secs(5).await;
                continue;
            }
            info!("Wifi started");
        }
        info!("About to connect to {SSID:?}");

        match controller.connect_async().await {
            Ok(_) => info!("Wifi connected"),
            Err(e) => {
                error!("Failed to connect to wifi: {e:?}");
                Timer::after_secs(1).await
            }
        }
    }
}

#[embassy_executor::task]
pub async fn net_runner_task(mut runner: Runner<'static, WifiDevice<'static, WifiStaDevice>>) {
    runner.run().await
}
