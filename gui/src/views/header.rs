use crate::messages::Message;
use crate::{styles, App, MUTED};
use iced::widget::{button, column, row, text, Space};
use iced::{Element, Fill, Font};
use krypt_core::display::short_address;
use krypt_core::Phase;

impl App {
    pub(crate) fn view_header(&self) -> Element<'_, Message> {
        let title = text("Krypt").size(24).font(styles::BOLD);
        let network = text(format!(
            "{} · {}",
            self.config.network,
            short_address(&self.config.contract_address)
        ))
        .size(12)
        .color(MUTED);
        let left = column![title, network].spacing(2);

        let right: Element<'_, Message> = match self.session.account() {
            Some(account) => row![
                text(short_address(account)).size(13).font(Font::MONOSPACE),
                button(text("Copy").size(11))
                    .padding([4, 8])
                    .style(styles::btn_secondary)
                    .on_press(Message::CopyAddress),
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center)
            .into(),
            None => {
                let busy = matches!(self.session.phase(), Phase::Checking | Phase::Connecting);
                let label = if busy { "Connecting..." } else { "Connect Wallet" };
                let mut connect = button(text(label).size(14))
                    .padding([8, 18])
                    .style(styles::btn_primary);
                if !busy && self.service.is_some() {
                    connect = connect.on_press(Message::ConnectWallet);
                }
                connect.into()
            }
        };

        row![left, Space::new().width(Fill), right]
            .padding(15)
            .align_y(iced::Alignment::Center)
            .into()
    }
}
