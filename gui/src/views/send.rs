use crate::messages::Message;
use crate::{styles, App, MUTED};
use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Element, Fill};
use krypt_core::FormField;

impl App {
    pub(crate) fn view_send(&self) -> Element<'_, Message> {
        let title = text("Send").size(20).font(styles::BOLD);
        let form = self.session.form();
        let locked = self.session.is_loading() || self.in_flight.is_some();

        let input = |field: FormField, placeholder: &'static str| {
            let widget = text_input(placeholder, form.get(field));
            if locked {
                widget
            } else {
                widget.on_input(move |v| Message::FieldChanged(field, v))
            }
        };

        let mut send = button(text("Send now").size(14))
            .padding([10, 24])
            .style(styles::btn_primary);
        if self.session.can_submit() && self.in_flight.is_none() {
            send = send.on_press(Message::SendTransaction);
        }
        let mut clear = button(text("Clear").size(14))
            .padding([10, 18])
            .style(styles::btn_secondary);
        if !locked {
            clear = clear.on_press(Message::ClearForm);
        }

        let mut col = column![
            text("Address To").size(12).color(MUTED),
            input(FormField::AddressTo, "0x..."),
            Space::new().height(4),
            text("Amount (ETH)").size(12).color(MUTED),
            input(FormField::Amount, "0.01"),
            Space::new().height(4),
            text("Keyword (Gif)").size(12).color(MUTED),
            input(FormField::Keyword, "keyword"),
            Space::new().height(4),
            text("Enter Message").size(12).color(MUTED),
            input(FormField::Message, "message"),
            Space::new().height(12),
            row![send, clear].spacing(8),
        ]
        .spacing(4);

        if self.session.account().is_none() {
            col = col.push(text("Connect your wallet to send.").size(12).color(MUTED));
        }
        col = self.push_status(col, "Sending...");

        if let (Some(hash), Some(_)) = (self.last_native_tx, &self.config.explorer_url) {
            col = col.push(
                button(text("View transfer in explorer").size(12))
                    .padding([6, 12])
                    .style(styles::btn_secondary)
                    .on_press(Message::OpenExplorer(hash)),
            );
        }

        column![
            title,
            container(col).padding(24).width(Fill).style(styles::card),
        ]
        .spacing(12)
        .into()
    }
}
