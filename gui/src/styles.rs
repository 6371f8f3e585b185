use iced::font::Weight;
use iced::widget::{button, container, Space};
use iced::{Background, Border, Color, Element, Fill, Font, Shadow, Vector};

use crate::{ACTIVE, BORDER, MUTED, PRIMARY, SURFACE};

pub const ACCENT: Color = Color::from_rgb(0.059, 0.757, 0.718);
pub const DANGER: Color = Color::from_rgb(0.906, 0.192, 0.192);

pub const BOLD: Font = Font {
    weight: Weight::Bold,
    ..Font::DEFAULT
};

fn rounded(radius: f32) -> Border {
    Border {
        radius: radius.into(),
        ..Default::default()
    }
}

fn outlined(color: Color) -> Border {
    Border {
        color,
        width: 1.0,
        radius: 8.0.into(),
    }
}

pub fn card(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(SURFACE)),
        border: Border {
            color: BORDER,
            width: 1.0,
            radius: 14.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.2),
            offset: Vector::new(0.0, 2.0),
            blur_radius: 10.0,
        },
        ..Default::default()
    }
}

pub fn btn_primary(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Active => PRIMARY,
        button::Status::Hovered => Color { a: 0.85, ..PRIMARY },
        button::Status::Pressed => Color { a: 0.7, ..PRIMARY },
        button::Status::Disabled => ACTIVE,
    };
    let text_color = if status == button::Status::Disabled {
        MUTED
    } else {
        Color::WHITE
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: rounded(10.0),
        ..Default::default()
    }
}

pub fn btn_secondary(_theme: &iced::Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Active => button::Style {
            text_color: Color::from_rgb(0.85, 0.87, 0.90),
            border: outlined(BORDER),
            ..Default::default()
        },
        button::Status::Hovered | button::Status::Pressed => button::Style {
            background: Some(Background::Color(ACTIVE)),
            text_color: Color::WHITE,
            border: outlined(BORDER),
            ..Default::default()
        },
        button::Status::Disabled => button::Style {
            text_color: MUTED,
            border: outlined(Color { a: 0.5, ..BORDER }),
            ..Default::default()
        },
    }
}

pub fn separator<'a, M: 'a>() -> Element<'a, M> {
    container(Space::new())
        .width(Fill)
        .height(1)
        .style(|_theme| container::Style {
            background: Some(Background::Color(BORDER)),
            ..Default::default()
        })
        .into()
}
