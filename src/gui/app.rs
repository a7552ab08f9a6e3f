//! Box Plot Viewer
//! Interactive window: summary statistics on the left, box plot in the center.

use crate::charts::{ChartData, ChartError, ChartPlotter};
use crate::stats::{Summary, STATISTIC_LABELS};
use egui::{RichText, SidePanel};

const WINDOW_TITLE: &str = "EDA - 401k";

/// Main application window.
pub struct BoxPlotViewer {
    chart: ChartData,
    summary: Summary,
}

impl BoxPlotViewer {
    pub fn new(chart: ChartData, summary: Summary) -> Self {
        Self { chart, summary }
    }

    /// Open the window and block until it is closed.
    pub fn run(self) -> Result<(), ChartError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 520.0])
                .with_min_inner_size([800.0, 400.0])
                .with_title(WINDOW_TITLE),
            ..Default::default()
        };

        log::info!("Opening chart window");
        eframe::run_native(
            WINDOW_TITLE,
            options,
            Box::new(move |_cc| Ok(Box::new(self))),
        )
        .map_err(|e| ChartError::Window(e.to_string()))
    }

    fn draw_summary_table(ui: &mut egui::Ui, summary: &Summary) {
        if summary.is_empty() {
            ui.label("No numeric columns");
            return;
        }

        egui::Grid::new("summary_table")
            .striped(true)
            .min_col_width(55.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Column").strong().size(11.0));
                for label in STATISTIC_LABELS {
                    ui.label(RichText::new(label).strong().size(11.0));
                }
                ui.end_row();

                for stats in &summary.columns {
                    ui.label(RichText::new(&stats.name).size(11.0));
                    ui.label(RichText::new(stats.count.to_string()).size(11.0));
                    for value in &stats.as_row()[1..] {
                        ui.label(RichText::new(format!("{:.3}", value)).size(11.0));
                    }
                    ui.end_row();
                }
            });
    }
}

impl eframe::App for BoxPlotViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("summary_panel")
            .min_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Summary");
                egui::ScrollArea::both().show(ui, |ui| {
                    Self::draw_summary_table(ui, &self.summary);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.chart.title);
            ChartPlotter::draw_boxplot_chart(ui, &self.chart);
        });
    }
}
