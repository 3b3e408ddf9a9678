mod controller;
mod state;
mod theme;
mod toast;
mod ui;

use crate::upload::{SelectedFile, ShareClient, ShareError};
use crate::utils::clipboard::SystemClipboard;
use bytes::Bytes;
use eframe::{egui, App};
use std::time::Instant;
use tokio::runtime::Handle;

use controller::ShareController;
use theme::Theme;

pub struct EasyShareApp {
    controller: ShareController,
    theme: Theme,
    clipboard: SystemClipboard,
    api_base: String,
}

impl EasyShareApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        client: ShareClient,
        runtime: Handle,
        api_base: String,
    ) -> Self {
        let theme = Theme::load(cc.storage);
        theme.apply(&cc.egui_ctx);
        tracing::info!(?theme, %api_base, "Initializing EasyShare");

        Self {
            controller: ShareController::new(client, runtime),
            theme,
            clipboard: SystemClipboard::default(),
            api_base,
        }
    }

    pub fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = self.theme.toggled();
        self.theme.apply(ctx);
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        self.controller.state_mut().drag_active = hovering;

        if dropped.is_empty() {
            return;
        }
        let selection = dropped
            .iter()
            .map(selected_from_drop)
            .collect::<Result<Vec<_>, _>>();
        // Failures are already on screen as a toast
        match selection {
            Ok(files) => {
                let _ = self.controller.select_files(files);
            }
            Err(_) if dropped.len() > 1 => self.controller.reject_selection(ShareError::MultiFile),
            Err(err) => self.controller.reject_selection(err),
        }
    }
}

fn selected_from_drop(file: &egui::DroppedFile) -> Result<SelectedFile, ShareError> {
    match (&file.path, &file.bytes) {
        (Some(path), _) => Ok(SelectedFile::Path(path.clone())),
        (None, Some(bytes)) => Ok(SelectedFile::InMemory {
            name: file.name.clone(),
            content: Bytes::copy_from_slice(bytes),
        }),
        (None, None) => Err(ShareError::FileRead {
            name: file.name.clone(),
            detail: "dropped without a path or contents".to_string(),
        }),
    }
}

impl App for EasyShareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_file_drops(ctx);

        let now = Instant::now();
        self.controller.poll(now);
        self.render(ctx);

        if let Some(delay) = self.controller.repaint_after(now) {
            ctx.request_repaint_after(delay);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.theme.store(storage);
    }
}
