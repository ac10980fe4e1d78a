//! Demo host: a small song arranged on the time table, with undo/redo and
//! the full gesture set wired through the engine events.

mod ui;

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use eframe::egui;
use log::{info, warn};

use timegrid_core::{
    directory, CellData, RowData, TimeSignature, TimeTable, TimeTableConfig, TimeTableDataSource,
    TimeTableEvent,
};

use crate::ui::theme::THEME;
use crate::ui::timetable::{show_time_table, TimeTableUiState};

/// Host-side source of truth. The engine keeps its own copy and pulls a
/// fresh one on every `reload_data`.
struct Song {
    rows: Vec<RowData<String>>,
    time_signature: TimeSignature,
}

impl Song {
    fn demo() -> Self {
        let chords = RowData::new(
            "Chords",
            vec![
                CellData::new("C7".to_string(), 0.0, 4.0),
                CellData::new("Dm7".to_string(), 4.0, 4.0),
                CellData::new("G7b5".to_string(), 8.0, 4.0),
                CellData::new("C7".to_string(), 12.0, 4.0),
            ],
        );
        let bass = RowData::new(
            "Bass",
            vec![
                CellData::new("C".to_string(), 0.0, 1.0),
                CellData::new("C".to_string(), 4.0, 1.0),
                CellData::new("G".to_string(), 8.0, 1.0),
                CellData::new("C".to_string(), 12.0, 1.0),
            ],
        );
        let melody = RowData::new(
            "Melody",
            vec![
                CellData::new("C".to_string(), 0.0, 2.0),
                CellData::new("E".to_string(), 2.0, 2.0),
                CellData::new("G".to_string(), 4.0, 2.0),
                CellData::new("B".to_string(), 6.0, 2.0),
            ],
        );
        let synths = RowData::new(
            "Synths",
            vec![
                CellData::new("Pad".to_string(), 0.0, 8.0),
                CellData::new("Lead".to_string(), 8.0, 8.0),
            ],
        );
        Self {
            rows: vec![chords, bass, melody, synths],
            time_signature: TimeSignature::default(),
        }
    }
}

impl TimeTableDataSource<String> for Song {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    fn row_at(&self, index: usize) -> Option<RowData<String>> {
        self.rows.get(index).cloned()
    }
}

struct TimegridApp {
    song: Song,
    table: TimeTable<String>,
    events: Receiver<TimeTableEvent<String>>,
    ui_state: TimeTableUiState,
    playhead_beats: f64,
}

impl TimegridApp {
    fn new(
        table: TimeTable<String>,
        events: Receiver<TimeTableEvent<String>>,
    ) -> Self {
        let song = Song::demo();
        let mut app = Self {
            song,
            table,
            events,
            ui_state: TimeTableUiState::default(),
            playhead_beats: 0.0,
        };
        app.table.reload_data(&app.song);
        app
    }

    /// Applies one engine event to the source-of-truth model. Returns true
    /// when the model changed and the table needs a reload.
    fn apply_event(&mut self, event: TimeTableEvent<String>) -> bool {
        match event {
            TimeTableEvent::CellsEdited(edits) => {
                let mut moved = Vec::new();
                for edit in &edits {
                    let Some(cell) = self
                        .song
                        .rows
                        .get_mut(edit.index.row)
                        .and_then(|row| row.cells.get_mut(edit.index.index))
                    else {
                        warn!("edit for unknown cell {:?}", edit.index);
                        continue;
                    };
                    cell.position = edit.new_position;
                    cell.duration = edit.new_duration;
                    if edit.new_row != edit.index.row {
                        // Row changes are append-then-remove so the batch's
                        // original offsets stay valid throughout.
                        let cell = cell.clone();
                        if let Err(e) =
                            directory::append_cell(&mut self.song.rows, cell, edit.new_row)
                        {
                            warn!("dropping cross-row edit: {e}");
                            continue;
                        }
                        moved.push(edit.index);
                    }
                }
                if let Err(e) = directory::remove_cells(&mut self.song.rows, &moved) {
                    warn!("row-change cleanup failed: {e}");
                }
                true
            }
            TimeTableEvent::CellsDeleteRequested(indices) => {
                match directory::remove_cells(&mut self.song.rows, &indices) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("delete request rejected: {e}");
                        false
                    }
                }
            }
            TimeTableEvent::HistoryChanged(rows) => {
                // The engine already replayed this snapshot internally; only
                // the host model needs catching up.
                self.song.rows = rows;
                false
            }
            TimeTableEvent::PlayheadMoved(beats) => {
                self.playhead_beats = beats;
                false
            }
            TimeTableEvent::RangeHeadMoved(beats) => {
                info!("playback range end moved to beat {beats}");
                false
            }
        }
    }
}

impl eframe::App for TimegridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut reload = false;
        for event in self.events.try_iter().collect::<Vec<_>>() {
            reload |= self.apply_event(event);
        }
        if reload {
            self.table.reload_data(&self.song);
        }

        egui::TopBottomPanel::top("transport").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.table.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.table.undo();
                }
                if ui
                    .add_enabled(self.table.can_redo(), egui::Button::new("Redo"))
                    .clicked()
                {
                    self.table.redo();
                }
                ui.separator();
                ui.colored_label(
                    THEME.text_secondary,
                    format!("Playhead: beat {:.2}", self.playhead_beats),
                );
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let undo = ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z));
            let redo = ui.input(|i| {
                i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z)
            });
            if redo {
                self.table.redo();
            } else if undo {
                self.table.undo();
            }

            show_time_table(
                ui,
                &mut self.table,
                &mut self.ui_state,
                &|painter, rect, cell, _selected| {
                    painter.rect(
                        rect.shrink(1.0),
                        2.0,
                        THEME.cell_bg,
                        egui::Stroke::new(1.0, THEME.cell_border),
                        egui::StrokeKind::Middle,
                    );
                    painter.text(
                        rect.left_center() + egui::vec2(6.0, 0.0),
                        egui::Align2::LEFT_CENTER,
                        &cell.payload,
                        egui::FontId::proportional(12.0),
                        THEME.text_primary,
                    );
                },
            );
        });
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let (tx, rx) = unbounded();
    let table = TimeTable::new(tx, TimeTableConfig::default());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Timegrid",
        options,
        Box::new(|_cc| Ok(Box::new(TimegridApp::new(table, rx)))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;
    Ok(())
}
