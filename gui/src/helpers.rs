use crate::messages::Message;
use crate::{styles, App, MUTED};
use iced::widget::{table, text, Column};
use iced::{Element, Fill, Font, Length};
use krypt_core::display::short_address;
use krypt_core::TransferRecord;

/// Pre-formatted row data passed to the table column view closures.
#[derive(Clone)]
struct TransferRow {
    time: String,
    from: String,
    to: String,
    amount: String,
    keyword: String,
    message: String,
}

impl TransferRow {
    fn new(record: &TransferRecord) -> Self {
        Self {
            time: record.timestamp.clone(),
            from: short_address(&record.sender),
            to: short_address(&record.receiver),
            amount: format!("{} ETH", record.amount),
            keyword: record.keyword.clone(),
            message: record.message.clone(),
        }
    }
}

impl App {
    /// Transfers table, newest first.
    pub(crate) fn view_transfer_table<'a>(
        &'a self,
        records: &'a [TransferRecord],
    ) -> Element<'a, Message> {
        let rows: Vec<TransferRow> = records.iter().rev().map(TransferRow::new).collect();

        let tbl = table::table(
            [
                table::column(
                    text("Time").size(12).color(MUTED),
                    |r: TransferRow| -> Element<'_, Message> { text(r.time).size(12).into() },
                )
                .width(Length::FillPortion(5)),
                table::column(
                    text("From").size(12).color(MUTED),
                    |r: TransferRow| -> Element<'_, Message> {
                        text(r.from).size(12).font(Font::MONOSPACE).into()
                    },
                )
                .width(Length::FillPortion(4)),
                table::column(
                    text("To").size(12).color(MUTED),
                    |r: TransferRow| -> Element<'_, Message> {
                        text(r.to).size(12).font(Font::MONOSPACE).into()
                    },
                )
                .width(Length::FillPortion(4)),
                table::column(
                    text("Amount").size(12).color(MUTED),
                    |r: TransferRow| -> Element<'_, Message> {
                        text(r.amount).size(13).font(styles::BOLD).into()
                    },
                )
                .width(Length::FillPortion(3)),
                table::column(
                    text("Keyword").size(12).color(MUTED),
                    |r: TransferRow| -> Element<'_, Message> {
                        text(r.keyword).size(12).color(styles::ACCENT).into()
                    },
                )
                .width(Length::FillPortion(3)),
                table::column(
                    text("Message").size(12).color(MUTED),
                    |r: TransferRow| -> Element<'_, Message> { text(r.message).size(12).into() },
                )
                .width(Length::FillPortion(6)),
            ],
            rows,
        )
        .width(Fill)
        .padding_x(12)
        .padding_y(8)
        .separator_x(0)
        .separator_y(1);

        tbl.into()
    }

    /// Append loading, error, and success status messages to a column.
    pub(crate) fn push_status<'a>(
        &'a self,
        col: Column<'a, Message>,
        loading_text: &'a str,
    ) -> Column<'a, Message> {
        let mut col = col;
        if self.session.is_loading() || self.in_flight.is_some() {
            col = col.push(text(loading_text).size(13).color(MUTED));
        }
        if let Some(msg) = &self.status_message {
            col = col.push(text(msg.as_str()).size(13).color(MUTED));
        }
        if let Some(err) = &self.error_message {
            col = col.push(text(err.as_str()).size(13).color(styles::DANGER));
        }
        if let Some(msg) = &self.success_message {
            col = col.push(text(msg.as_str()).size(13).color(styles::ACCENT));
        }
        col
    }
}
