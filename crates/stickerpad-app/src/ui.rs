//! UI components using egui.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, RichText, Stroke, Vec2};
use stickerpad_core::{EditorCommand, EditorState, Thickness, ToolManager};

const PANEL_BG: Color32 = Color32::from_rgb(255, 255, 255);
const BORDER: Color32 = Color32::from_rgb(226, 232, 240);
const STICKER_BUTTON_SIZE: f32 = 22.0;

/// UI state that is not part of the editor.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Text typed into the custom sticker field.
    pub custom_sticker_input: String,
}

/// Render all UI panels and return the command triggered this frame, if any.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, editor: &EditorState) -> Option<EditorCommand> {
    let toolbar_action = render_toolbar(ctx, editor);
    let sticker_action = if shows_sticker_bar(editor.tools()) {
        render_sticker_bar(ctx, ui_state, editor)
    } else {
        None
    };

    toolbar_action.or(sticker_action)
}

/// Mode, thickness and history buttons along the top edge.
fn render_toolbar(ctx: &Context, editor: &EditorState) -> Option<EditorCommand> {
    let mut action = None;
    let tools = editor.tools();
    let history = editor.history();

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.selectable_label(!tools.is_sticker_mode(), "Draw").clicked() {
                        action = Some(EditorCommand::SelectDraw);
                    }
                    if ui.selectable_label(tools.is_sticker_mode(), "Stickers").clicked() {
                        action = Some(EditorCommand::EnterStickerMode);
                    }

                    ui.separator();

                    if shows_thickness(tools) {
                        for thickness in [Thickness::Thin, Thickness::Thick] {
                            if ui
                                .selectable_label(tools.thickness() == thickness, thickness.label())
                                .clicked()
                            {
                                action = Some(EditorCommand::SetThickness(thickness));
                            }
                        }
                        ui.separator();
                    }

                    if ui.add_enabled(history.can_undo(), egui::Button::new("Undo")).clicked() {
                        action = Some(EditorCommand::Undo);
                    }
                    if ui.add_enabled(history.can_redo(), egui::Button::new("Redo")).clicked() {
                        action = Some(EditorCommand::Redo);
                    }
                    if ui.button("Clear").clicked() {
                        action = Some(EditorCommand::Clear);
                    }
                });
            });
        });

    action
}

/// Sticker palette and custom sticker entry along the bottom edge.
fn render_sticker_bar(
    ctx: &Context,
    ui_state: &mut UiState,
    editor: &EditorState,
) -> Option<EditorCommand> {
    let mut action = None;
    let tools = editor.tools();

    egui::Area::new(egui::Id::new("sticker_bar"))
        .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    for glyph in tools.palette() {
                        let selected = tools.current_sticker() == Some(glyph.as_str());
                        let label = RichText::new(glyph.as_str()).size(STICKER_BUTTON_SIZE);
                        if ui.selectable_label(selected, label).clicked() {
                            action = Some(EditorCommand::SelectSticker(glyph.clone()));
                        }
                    }

                    ui.separator();

                    let response = ui.add(
                        egui::TextEdit::singleline(&mut ui_state.custom_sticker_input)
                            .hint_text("Custom sticker")
                            .desired_width(110.0),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("+").clicked() || submitted {
                        if let Some(command) = submit_custom_stickers(&mut ui_state.custom_sticker_input) {
                            action = Some(command);
                        }
                    }
                });
            });
        });

    action
}

/// Thin/Thick only apply to the marker.
fn shows_thickness(tools: &ToolManager) -> bool {
    !tools.is_sticker_mode()
}

fn shows_sticker_bar(tools: &ToolManager) -> bool {
    tools.is_sticker_mode()
}

/// Turn the custom sticker field into a command, emptying it. Blank input yields nothing.
pub fn submit_custom_stickers(input: &mut String) -> Option<EditorCommand> {
    let text = std::mem::take(input);
    if text.trim().is_empty() {
        return None;
    }
    Some(EditorCommand::AddStickers(text))
}

fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}
