use crate::messages::Message;
use crate::{styles, App, MUTED};
use iced::widget::{button, column, container, row, text, Space};
use iced::{Element, Fill};

impl App {
    pub(crate) fn view_transfers(&self) -> Element<'_, Message> {
        let title = text("Latest Transactions").size(20).font(styles::BOLD);
        let count = match self.session.transaction_count() {
            Some(n) => format!("{n} on chain"),
            None => String::new(),
        };

        let mut refresh = button(text(if self.refreshing { "Loading..." } else { "Refresh" }).size(13))
            .padding([6, 12])
            .style(styles::btn_secondary);
        if !self.refreshing && self.service.is_some() {
            refresh = refresh.on_press(Message::RefreshTransfers);
        }

        let header = row![
            title,
            Space::new().width(10),
            text(count).size(12).color(MUTED),
            Space::new().width(Fill),
            refresh,
        ]
        .align_y(iced::Alignment::Center);

        let records = self.session.transactions();
        let body: Element<'_, Message> = if records.is_empty() {
            text("No transfers recorded yet.").size(14).color(MUTED).into()
        } else {
            self.view_transfer_table(records)
        };

        column![
            header,
            container(body).padding(12).width(Fill).style(styles::card),
        ]
        .spacing(12)
        .padding(iced::Padding::ZERO.bottom(20))
        .into()
    }
}
