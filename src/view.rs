mod surface;

use iced::{
    alignment::Vertical,
    widget::{button, center, column, container, mouse_area, opaque, row, stack, text, Column},
    Element, Font, Length, Theme,
};
use iced_aw::quad;

use crate::{
    common::{CANVAS_HEIGHT, CANVAS_WIDTH},
    message::Message,
    state::{Dialogue, EditorState},
};
use surface::{EditorCanvas, TileSelect};

fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        iced::Color {
                            a: 0.5,
                            ..iced::Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

pub fn modal_background_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.base.color.into()),
        border: iced::border::rounded(4)
            .color(palette.background.weak.color)
            .width(1.0),
        ..container::Style::default()
    }
}

fn vertical_separator() -> quad::Quad {
    quad::Quad {
        quad_color: iced::Color::from([0.5; 3]).into(),
        quad_border: iced::Border {
            radius: iced::border::Radius::new(1.0),
            ..Default::default()
        },
        inner_bounds: iced_aw::widget::InnerBounds::Ratio(1.0, 1.0),
        width: Length::Fixed(1.0),
        ..Default::default()
    }
}

const CONTROLS: [(&str, &str, &str); 8] = [
    ("click", "Paint", "select colors and tiles, paint sprites and map cells"),
    ("drag", "Brush", "keep painting the sprite or the map"),
    ("arrows", "Move", "select the neighbouring tile"),
    ("i", "Identify", "highlight map cells using the selected tile"),
    ("d", "Dump", "log the sprite being edited"),
    ("r", "Reset", "clear the tileset and the map"),
    ("h", "Help", "show this list"),
    ("Esc", "Close", "close this dialog"),
];

pub fn help_view(_state: &EditorState) -> Element<Message> {
    let mut col = Column::new();
    col = col.push(text("Keyboard and mouse controls:"));
    for (key, name, desc) in CONTROLS {
        col = col.push(
            row![
                text(key).width(60).font(Font {
                    weight: iced::font::Weight::ExtraBold,
                    ..Default::default()
                }),
                text(format!("{}: {}", name, desc)).width(400),
            ]
            .align_y(Vertical::Center),
        );
    }
    col = col.push(text("Every edit copies C source for it to the clipboard."));

    container(col.spacing(10))
        .width(500)
        .padding(25)
        .style(modal_background_style)
        .into()
}

pub fn reset_view(_state: &EditorState) -> Element<Message> {
    container(
        column![
            text("Clear the whole tileset and map? This cannot be undone."),
            row![
                button(text("Reset"))
                    .style(button::danger)
                    .on_press(Message::Reset),
                button(text("Cancel"))
                    .style(button::secondary)
                    .on_press(Message::HideModal),
            ]
            .spacing(10),
        ]
        .spacing(15),
    )
    .width(450)
    .padding(25)
    .style(modal_background_style)
    .into()
}

pub fn view_dialogue<'a>(
    state: &'a EditorState,
    main_view: Element<'a, Message>,
) -> Element<'a, Message> {
    if let Some(dialogue) = &state.dialogue {
        match dialogue {
            Dialogue::Help => modal(main_view, help_view(state), Message::HideModal),
            Dialogue::ConfirmReset => modal(main_view, reset_view(state), Message::HideModal),
        }
    } else {
        main_view
    }
}

fn side_controls(state: &EditorState) -> Element<Message> {
    let (sx, sy) = state.workspace.palette.selected();
    column![
        row![
            button(text("\u{F505}").font(iced_fonts::BOOTSTRAP_FONT))
                .style(button::secondary)
                .on_press(Message::HelpDialogue),
            button(text("\u{F5DE}").font(iced_fonts::BOOTSTRAP_FONT))
                .style(button::danger)
                .on_press(Message::ResetDialogue),
        ]
        .spacing(10),
        text(format!("Tile: {} ({}, {})", state.workspace.palette.selected_index(), sx, sy)),
        text(format!("Color: {}", state.workspace.colors.selected())),
        button(text("Copy sprite")).width(Length::Fill).on_press(Message::CopySprite),
        button(text("Copy tileset")).width(Length::Fill).on_press(Message::CopyTileset),
        button(text("Copy map")).width(Length::Fill).on_press(Message::CopyMap),
        button(text(if state.identify_tile {
            "Identify: on"
        } else {
            "Identify: off"
        }))
        .style(button::secondary)
        .width(Length::Fill)
        .on_press(Message::ToggleIdentify),
    ]
    .spacing(10)
    .padding(10)
    .width(160)
    .into()
}

pub fn view(state: &EditorState) -> Element<Message> {
    let editors: Element<Message> = stack![
        iced::widget::canvas(EditorCanvas {
            workspace: &state.workspace,
            identify_tile: state.identify_tile,
        })
        .width(CANVAS_WIDTH)
        .height(CANVAS_HEIGHT),
        iced::widget::canvas(TileSelect {
            workspace: &state.workspace,
        })
        .width(CANVAS_WIDTH)
        .height(CANVAS_HEIGHT),
    ]
    .into();

    let mut main_view: Element<Message> = row![editors, vertical_separator(), side_controls(state)]
        .spacing(0)
        .width(Length::Fill)
        .height(Length::Fill)
        .into();

    main_view = view_dialogue(state, main_view);
    main_view
}
