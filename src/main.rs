#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::Path;
use std::time::{Duration, Instant};

use clap::Parser;
use eframe::{egui, App, NativeOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

use codewalk::config::{self, Config};
use codewalk::highlight;
use codewalk::registry::{builtin_steps, StepRegistry};
use codewalk::script::ReferenceText;
use codewalk::simulation::architecture::ArchitectureFrame;
use codewalk::simulation::data_cleaning::DataCleaningFrame;
use codewalk::simulation::sliding_window::SlidingWindowFrame;
use codewalk::simulation::training_curve::TrainingCurveFrame;
use codewalk::walkthrough::{SimulationFrame, WalkthroughController};

// Palette lifted from the narrative's theme.
const PRIMARY: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
const SECONDARY: egui::Color32 = egui::Color32::from_rgb(249, 115, 22);
const EMERALD: egui::Color32 = egui::Color32::from_rgb(16, 185, 129);
const ALERT: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const PANEL_BG: egui::Color32 = egui::Color32::from_rgb(22, 27, 38);

#[derive(Parser, Debug)]
#[command(
    name = "codewalk",
    about = "Interactive walkthrough of a traffic-prediction training script"
)]
struct Cli {
    /// Optional TOML config with script_path / start_step overrides.
    #[arg(long, default_value = "walkthrough.toml")]
    config: String,
    /// Step to open the walkthrough at (overrides the config file).
    #[arg(long)]
    start_step: Option<usize>,
    /// Print the step table as JSON and exit.
    #[arg(long)]
    list_steps: bool,
}

struct WalkthroughApp {
    script: ReferenceText,
    controller: WalkthroughController,
    config_error: Option<String>,
    show_inspector: bool,
}

impl WalkthroughApp {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        script: ReferenceText,
        controller: WalkthroughController,
        config_error: Option<String>,
    ) -> Self {
        Self {
            script,
            controller,
            config_error,
            show_inspector: false,
        }
    }

    fn draw_code_panel(&self, ui: &mut egui::Ui) {
        let step = self.controller.current_step();
        ui.label(
            egui::RichText::new(step.title.to_uppercase())
                .color(SECONDARY)
                .strong()
                .small(),
        );
        ui.separator();

        let attrs = highlight::line_attributes(&self.script, step.range);
        egui::ScrollArea::vertical()
            .id_source("code_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = 1.0;
                for (idx, line) in self.script.lines().iter().enumerate() {
                    let emphasized = attrs[idx].emphasized;
                    let display = if line.is_empty() { " " } else { line.as_str() };
                    let (gutter, text) = if emphasized {
                        (egui::Color32::from_gray(150), egui::Color32::from_gray(230))
                    } else {
                        (egui::Color32::from_gray(80), egui::Color32::from_gray(110))
                    };
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{:>3}", idx + 1))
                                .monospace()
                                .color(gutter),
                        );
                        let mut rich = egui::RichText::new(display).monospace().color(text);
                        if emphasized {
                            rich = rich
                                .background_color(egui::Color32::from_rgba_unmultiplied(
                                    56, 189, 248, 26,
                                ));
                        }
                        ui.label(rich);
                    });
                }
            });
    }

    fn draw_visual_panel(&self, ui: &mut egui::Ui) {
        let frame = self.controller.frame();
        ui.add_space(8.0);
        match &frame.simulation {
            None => draw_static_step(ui, frame.step_id),
            Some(SimulationFrame::SlidingWindow(f)) => draw_sliding_window(ui, f),
            Some(SimulationFrame::DataCleaning(f)) => draw_data_cleaning(ui, f),
            Some(SimulationFrame::Architecture(f)) => draw_architecture(ui, f),
            Some(SimulationFrame::TrainingCurve(f)) => draw_training_curve(ui, f),
        }
    }
}

impl App for WalkthroughApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.advance(now);

        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.controller.go_to_next(now);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.controller.go_to_previous(now);
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.heading("Traffic Predictor AI");
                    ui.label(
                        egui::RichText::new("Interactive Code Walkthrough")
                            .small()
                            .weak(),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let enabled = !self.controller.at_last_step();
                    if ui
                        .add_enabled(enabled, egui::Button::new("Next Step"))
                        .clicked()
                    {
                        self.controller.go_to_next(now);
                    }
                    let enabled = !self.controller.at_first_step();
                    if ui
                        .add_enabled(enabled, egui::Button::new("Previous"))
                        .clicked()
                    {
                        self.controller.go_to_previous(now);
                    }
                    ui.label(format!(
                        "Step {}/{}",
                        self.controller.active_index() + 1,
                        self.controller.step_count()
                    ));
                    ui.checkbox(&mut self.show_inspector, "Frame inspector");
                    if let Some(err) = &self.config_error {
                        ui.colored_label(ALERT, err);
                    }
                });
            });
        });

        if self.show_inspector {
            egui::TopBottomPanel::bottom("inspector")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_source("inspector_scroll")
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            let mut json = serde_json::to_string_pretty(&self.controller.frame())
                                .unwrap_or_else(|e| format!("serialization failed: {e}"));
                            ui.add(
                                egui::TextEdit::multiline(&mut json)
                                    .font(egui::TextStyle::Monospace)
                                    .desired_width(f32::INFINITY)
                                    .interactive(false)
                                    .frame(false),
                            );
                        });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.draw_code_panel(&mut columns[0]);
                self.draw_visual_panel(&mut columns[1]);
            });
        });

        // Animations tick on the next poll, not on input events.
        ctx.request_repaint_after(Duration::from_millis(50));
    }
}

fn draw_static_step(ui: &mut egui::Ui, step_id: usize) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| match step_id {
        0 => {
            ui.heading(egui::RichText::new("Predicting the Future of Traffic").size(28.0));
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new(
                    "A hybrid CNN + GRU model that learns spatial bottlenecks and \
                     temporal memory from highway sensor data.",
                )
                .weak(),
            );
        }
        1 => {
            ui.heading("Loading the Tools");
            ui.add_space(8.0);
            for (name, role) in [
                ("PyTorch", "Model definition, training and inference"),
                ("Pandas & NumPy", "Loading and reshaping the sensor readings"),
                ("scikit-learn", "Scaling and evaluation metrics"),
            ] {
                ui.label(egui::RichText::new(name).color(PRIMARY).strong());
                ui.label(egui::RichText::new(role).small().weak());
                ui.add_space(6.0);
            }
        }
        _ => {
            ui.heading("Setting the Rules");
            ui.add_space(8.0);
            for (knob, meaning) in [
                ("SEQ_LENGTH = 12", "Look at 12 hours of past traffic to predict the next one."),
                ("BATCH_SIZE = 64", "Practice on 64 sequences at a time."),
                ("EPOCHS = 30", "Read through the entire dataset 30 times."),
                ("DEVICE = \"cuda\"", "Run the math on the GPU when available."),
            ] {
                ui.label(egui::RichText::new(knob).monospace().color(SECONDARY));
                ui.label(egui::RichText::new(meaning).small().weak());
                ui.add_space(6.0);
            }
        }
    });
}

fn draw_sliding_window(ui: &mut egui::Ui, frame: &SlidingWindowFrame) {
    ui.heading("The Sliding Window Concept");
    ui.label(
        egui::RichText::new(
            "The model looks at a window of the past 12 hours to predict the very \
             next hour, then the window slides forward.",
        )
        .weak(),
    );
    ui.add_space(12.0);

    let desired = egui::vec2(ui.available_width(), 220.0);
    let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, egui::Rounding::same(6.0), PANEL_BG);

    let n = frame.bars.len() as f32;
    let gap = 2.0;
    let bar_w = (rect.width() - gap * (n - 1.0)) / n;
    for (i, bar) in frame.bars.iter().enumerate() {
        let h = (rect.height() - 24.0) * (bar.value as f32 / 100.0);
        let x = rect.left() + i as f32 * (bar_w + gap);
        let bar_rect = egui::Rect::from_min_max(
            egui::pos2(x, rect.bottom() - h),
            egui::pos2(x + bar_w, rect.bottom()),
        );
        let color = if bar.target {
            SECONDARY
        } else if bar.in_window {
            PRIMARY
        } else {
            egui::Color32::from_gray(70)
        };
        painter.rect_filled(bar_rect, egui::Rounding::same(2.0), color);
        if bar.in_window || bar.target {
            painter.text(
                egui::pos2(x + bar_w / 2.0, bar_rect.top() - 8.0),
                egui::Align2::CENTER_CENTER,
                bar.value.to_string(),
                egui::FontId::monospace(9.0),
                egui::Color32::from_gray(200),
            );
        }
    }

    // Window box and the "predict this" pointer.
    let window_left = rect.left() + frame.window_start as f32 * (bar_w + gap);
    let window_width = (frame.target_index - frame.window_start) as f32 * (bar_w + gap) - gap;
    painter.rect_stroke(
        egui::Rect::from_min_size(
            egui::pos2(window_left, rect.top()),
            egui::vec2(window_width, rect.height()),
        ),
        egui::Rounding::same(4.0),
        egui::Stroke::new(2.0, PRIMARY),
    );
    let target_x = rect.left() + frame.target_index as f32 * (bar_w + gap) + bar_w / 2.0;
    painter.text(
        egui::pos2(target_x, rect.top() + 10.0),
        egui::Align2::CENTER_CENTER,
        "PREDICT",
        egui::FontId::proportional(10.0),
        SECONDARY,
    );

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("t=0").monospace().weak());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!("t={}", frame.bars.len()))
                    .monospace()
                    .weak(),
            );
        });
    });
}

fn draw_data_cleaning(ui: &mut egui::Ui, frame: &DataCleaningFrame) {
    ui.heading("Data Preparation & Time Travel");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("CLEANING MISSING SENSOR DATA").small().strong());
        if frame.phase == 0 {
            ui.colored_label(ALERT, "Detecting 0.0 values...");
        } else {
            ui.colored_label(EMERALD, "Interpolated!");
        }
    });
    ui.add_space(4.0);

    egui::Grid::new("sensor_grid").spacing([6.0, 6.0]).show(ui, |ui| {
        for row in &frame.rows {
            for cell in row {
                let (fill, text_color) = if cell.filled {
                    (egui::Color32::from_rgb(6, 58, 43), EMERALD)
                } else if cell.missing {
                    (egui::Color32::from_rgb(70, 18, 18), ALERT)
                } else {
                    (PANEL_BG, egui::Color32::from_gray(190))
                };
                let label = if cell.missing && !cell.filled {
                    "0.0".to_string()
                } else {
                    format!("{:.0}", cell.display)
                };
                egui::Frame::none()
                    .fill(fill)
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::symmetric(18.0, 10.0))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(label).monospace().color(text_color));
                    });
            }
            ui.end_row();
        }
    });

    ui.add_space(16.0);
    if frame.time_features_active {
        ui.label(egui::RichText::new("CYCLICAL TIME FEATURES").small().strong());
        ui.label(
            "How do we tell the model that 11:59 PM is right next to 12:01 AM? \
             The clock becomes a wave: sin/cos of the hour and the day of week.",
        );
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for feature in ["sin_hour", "cos_hour", "sin_day", "cos_day"] {
                ui.label(egui::RichText::new(feature).monospace().color(PRIMARY));
            }
        });
    } else {
        ui.label(egui::RichText::new("Cyclical time features…").weak());
    }
}

fn draw_architecture(ui: &mut egui::Ui, frame: &ArchitectureFrame) {
    ui.heading("The Brain of the AI");
    ui.label(
        egui::RichText::new(
            "Data flows through two brain regions: a CNN spotting immediate local \
             bottlenecks and a GRU remembering long-term trends.",
        )
        .weak(),
    );
    ui.add_space(12.0);

    for (i, stage) in frame.stages.iter().enumerate() {
        let stroke = if stage.active {
            egui::Stroke::new(2.0, EMERALD)
        } else {
            egui::Stroke::new(1.0, egui::Color32::from_gray(70))
        };
        ui.vertical_centered(|ui| {
            egui::Frame::none()
                .fill(PANEL_BG)
                .stroke(stroke)
                .rounding(egui::Rounding::same(6.0))
                .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                .show(ui, |ui| {
                    let name = egui::RichText::new(stage.info.name).strong();
                    ui.label(if stage.active {
                        name.color(EMERALD)
                    } else {
                        name
                    });
                    ui.label(egui::RichText::new(stage.info.detail).small().weak());
                });
            if i + 1 < frame.stages.len() {
                let next_active = frame.stages[i + 1].active;
                ui.label(
                    egui::RichText::new("↓")
                        .color(if next_active { PRIMARY } else { egui::Color32::from_gray(90) }),
                );
            }
        });
    }
}

fn draw_training_curve(ui: &mut egui::Ui, frame: &TrainingCurveFrame) {
    ui.heading("The Training Loop");
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(
                "The model repeatedly predicts, measures its loss, and adjusts \
                 its internal dials to improve.",
            )
            .weak(),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if frame.stopped {
                ui.colored_label(EMERALD, "TRAINING DONE");
            } else {
                ui.colored_label(
                    PRIMARY,
                    format!("EPOCH {}/{}", frame.current_epoch, frame.max_epoch),
                );
            }
        });
    });
    ui.add_space(12.0);

    let desired = egui::vec2(ui.available_width(), 260.0);
    let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
    let rect = response.rect.shrink(8.0);
    painter.rect_filled(response.rect, egui::Rounding::same(6.0), PANEL_BG);

    let x_of = |epoch: usize| {
        rect.left() + rect.width() * (epoch - 1) as f32 / (frame.max_epoch - 1) as f32
    };
    // Loss axis is fixed to [0, 1] like the narrative's chart; the
    // overfitting tail may clip at the top.
    let y_of = |loss: f32| rect.bottom() - rect.height() * loss.clamp(0.0, 1.0);

    for pair in frame.points.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        painter.line_segment(
            [
                egui::pos2(x_of(a.epoch), y_of(a.train_loss)),
                egui::pos2(x_of(b.epoch), y_of(b.train_loss)),
            ],
            egui::Stroke::new(2.5, PRIMARY),
        );
        painter.line_segment(
            [
                egui::pos2(x_of(a.epoch), y_of(a.val_loss)),
                egui::pos2(x_of(b.epoch), y_of(b.val_loss)),
            ],
            egui::Stroke::new(2.5, SECONDARY),
        );
    }

    if frame.stopped {
        let stop_x = x_of(frame.current_epoch.min(frame.max_epoch));
        let mut y = rect.top();
        while y < rect.bottom() {
            painter.line_segment(
                [egui::pos2(stop_x, y), egui::pos2(stop_x, (y + 6.0).min(rect.bottom()))],
                egui::Stroke::new(2.0, EMERALD),
            );
            y += 12.0;
        }
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Early Stopping Triggered\nValidation loss started to climb (overfitting)",
            egui::FontId::proportional(14.0),
            EMERALD,
        );
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.colored_label(PRIMARY, "■");
        ui.label(egui::RichText::new("Train loss").small());
        ui.colored_label(SECONDARY, "■");
        ui.label(egui::RichText::new("Validation loss").small());
    });
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.list_steps {
        match serde_json::to_string_pretty(&builtin_steps()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("could not serialize step table: {e}"),
        }
        return Ok(());
    }

    let mut config_error = None;
    let config = if Path::new(&cli.config).exists() {
        match config::load_config_from_file(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{e}; running with defaults");
                config_error = Some(e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let script = match config.script_path.as_deref() {
        Some(path) => match ReferenceText::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("{e}; falling back to the embedded script");
                config_error.get_or_insert(e);
                ReferenceText::embedded()
            }
        },
        None => ReferenceText::embedded(),
    };

    // Configuration errors surface here, before any window opens.
    let registry = match StepRegistry::new(builtin_steps(), script.line_count()) {
        Ok(registry) => registry,
        Err(e) => {
            log::error!("invalid step configuration: {e}");
            std::process::exit(2);
        }
    };

    let start_step = cli.start_step.or(config.start_step).unwrap_or(0);
    let controller = WalkthroughController::new(
        registry,
        start_step,
        StdRng::from_entropy(),
        Instant::now(),
    );

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 900.0])
            .with_min_inner_size([1000.0, 650.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Traffic Predictor AI - Interactive Code Walkthrough",
        options,
        Box::new(move |cc| Box::new(WalkthroughApp::new(cc, script, controller, config_error))),
    )
}
