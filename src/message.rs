use crate::common::PixelCoord;

#[derive(Debug, Clone)]
pub enum Message {
    Event(iced::Event),
    Click(PixelCoord, PixelCoord),
    Drag(PixelCoord, PixelCoord),
    CopySprite,
    CopyTileset,
    CopyMap,
    ToggleIdentify,
    ResetDialogue,
    Reset,
    HelpDialogue,
    HideModal,
}
