use std::time::Duration;

use eframe::{egui, Frame};
use egui::Context;

use reqwest::blocking::Client;
use reqwest::Result;

const SERVER: &str = "http://127.0.0.1:5000";

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(5, 0))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET request to `/v1/generate` with query parameters.
    fn get_generated(&self, params: &[(String, String)]) -> Result<String> {
        let response = self.client
            .get(format!("{SERVER}/v1/generate"))
            .query(params)
            .send()?
            .error_for_status()?;
        response.text()
    }

    /// Sends a PUT request to `/v1/train` with the text as body.
    fn put_train(&self, text: &str) -> Result<String> {
        let response = self.client
            .put(format!("{SERVER}/v1/train"))
            .body(text.to_owned())
            .send()?
            .error_for_status()?;
        response.text()
    }

    /// Sends a GET request to `/v1/models`.
    fn get_models(&self) -> Result<String> {
        let response = self.client
            .get(format!("{SERVER}/v1/models"))
            .send()?
            .error_for_status()?;
        response.text()
    }

    /// Sends a PUT request to `/v1/load` for one saved chain.
    fn put_load(&self, name: &str) -> Result<String> {
        let response = self.client
            .put(format!("{SERVER}/v1/load"))
            .query(&[("name", name)])
            .send()?
            .error_for_status()?;
        response.text()
    }

    /// Sends a PUT request to `/v1/save` under the given name.
    fn put_save(&self, name: &str) -> Result<String> {
        let response = self.client
            .put(format!("{SERVER}/v1/save"))
            .query(&[("name", name)])
            .send()?
            .error_for_status()?;
        response.text()
    }

    /// Sends a GET request to `/v1/statistics`.
    fn get_statistics(&self) -> Result<String> {
        let response = self.client
            .get(format!("{SERVER}/v1/statistics"))
            .send()?
            .error_for_status()?;
        response.text()
    }

    /// Sends a DELETE request to `/v1/chain`.
    fn delete_chain(&self) -> Result<String> {
        let response = self.client
            .delete(format!("{SERVER}/v1/chain"))
            .send()?
            .error_for_status()?;
        response.text()
    }
}

/// Global UI state (MUST persist between frames in egui).
struct GeneratorUI {
    rest: RESTContext,
    output: Option<String>,
    status: Option<String>,
    available_models: Vec<String>,
    save_name: String,

    max_length: usize,
    count: usize,

    use_start_with: bool,
    start_with: String,

    training_text: String,
}

impl GeneratorUI {
    /// Initializes the UI with sane defaults.
    fn new() -> Result<Self> {
        let mut generator = Self {
            rest: RESTContext::new()?,
            output: None,
            status: None,
            available_models: Vec::new(),
            save_name: String::from("chain"),

            max_length: 50,
            count: 1,

            use_start_with: false,
            start_with: String::new(),

            training_text: String::new(),
        };
        generator.get_models();
        Ok(generator)
    }

    /// Builds the query parameters for the API.
    ///
    /// `start_with` is only sent when enabled and not empty.
    fn build_query(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("max_length".into(), self.max_length.to_string()),
            ("count".into(), self.count.to_string()),
        ];

        if self.use_start_with && !self.start_with.trim().is_empty() {
            params.push(("start_with".into(), self.start_with.clone()));
        }

        params
    }

    /// Stores a request outcome in the status line.
    fn report(&mut self, result: Result<String>) {
        self.status = Some(match result {
            Ok(message) => message,
            Err(e) => format!("Error: {e}"),
        });
    }

    /// Performs the generation request.
    fn get_generated(&mut self) {
        let params = self.build_query();
        match self.rest.get_generated(&params) {
            Ok(text) => self.output = Some(text),
            Err(e) => self.output = Some(format!("Error: {e}")),
        }
    }

    /// Performs the get models request.
    fn get_models(&mut self) {
        match self.rest.get_models() {
            Ok(names) => {
                self.available_models = names
                    .lines()
                    .map(|s| s.trim().to_owned())
                    .filter(|s| !s.is_empty())
                    .collect()
            }
            Err(e) => self.status = Some(format!("Error: {e}")),
        }
    }
}

impl eframe::App for GeneratorUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {

            egui::Grid::new("generator_grid")
                .num_columns(2)
                .spacing([20.0, 6.0])
                .striped(true)
                .show(ui, |ui| {

                    // max_length
                    ui.label("Maximum length (tokens)");
                    ui.add(
                        egui::DragValue::new(&mut self.max_length)
                            .range(1..=1000)
                            .speed(1),
                    );
                    ui.end_row();

                    // count
                    ui.label("Number of texts");
                    ui.add(
                        egui::DragValue::new(&mut self.count)
                            .range(1..=20)
                            .speed(1),
                    );
                    ui.end_row();

                    // start text
                    ui.checkbox(&mut self.use_start_with, "Start with");
                    if self.use_start_with {
                        ui.text_edit_singleline(&mut self.start_with);
                    } else {
                        ui.label("Random starting state");
                    }
                    ui.end_row();

                    ui.separator();
                    ui.end_row();

                    // Generate button
                    if ui
                        .add_sized([200.0, 40.0], egui::Button::new("Generate"))
                        .clicked()
                    {
                        self.get_generated();
                    }

                    // Output
                    if let Some(text) = &self.output {
                        ui.label(text);
                    } else {
                        ui.label("Click Generate to start");
                    }
                    ui.end_row();
                });

            ui.separator();

            // Training
            ui.label("Training text");
            ui.text_edit_multiline(&mut self.training_text);
            ui.horizontal(|ui| {
                if ui.button("Train").clicked() {
                    let result = self.rest.put_train(&self.training_text);
                    self.report(result);
                }
                if ui.button("Clear chain").clicked() {
                    let result = self.rest.delete_chain();
                    self.report(result);
                }
                if ui.button("Statistics").clicked() {
                    let result = self.rest.get_statistics();
                    self.report(result);
                }
            });

            ui.separator();

            // Saved chains
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.save_name);
                if ui.button("Save").clicked() {
                    let result = self.rest.put_save(&self.save_name);
                    self.report(result);
                    self.get_models();
                }
                if ui.button("Refresh").clicked() {
                    self.get_models();
                }
            });

            let mut selected = None;
            for model in &self.available_models {
                if ui.button(format!("Load '{model}'")).clicked() {
                    selected = Some(model.clone());
                }
            }
            if let Some(model) = selected {
                let result = self.rest.put_load(&model);
                self.report(result);
            }

            if let Some(status) = &self.status {
                ui.separator();
                ui.label(status);
            }
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 560.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "rs-markov",
        options,
        Box::new(|_| Ok(Box::new(GeneratorUI::new()?))),
    )
}
