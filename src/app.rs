/*
 * Application Module
 *
 * This module defines the nannou application for the interactive mode.
 * Each frame advances the simulation by exactly one tick and draws every
 * agent as a point marker; closing the window ends the run. Records are
 * not exported in this mode, the render surface is the only sink.
 */

use nannou::prelude::*;
use std::sync::OnceLock;

use crate::config::SimConfig;
use crate::sim::Simulation;
use crate::MARKER_RADIUS;

// nannou's model callback is a plain fn, so the config chosen on the
// command line is handed over through this cell before the app starts.
static CONFIG: OnceLock<SimConfig> = OnceLock::new();

pub struct Model {
    pub sim: Simulation,
}

/// Launch the interactive window. The config must have been validated by
/// the caller; this function only returns when the window is closed.
pub fn run(config: SimConfig) {
    CONFIG.set(config).ok();
    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    let config = CONFIG.get().cloned().unwrap_or_default();

    app.new_window()
        .title("Crowd Flow Simulation")
        .size(config.width as u32, config.height as u32)
        .view(view)
        .build()
        .unwrap();

    let sim = Simulation::new(config).expect("configuration checked before launch");
    Model { sim }
}

fn update(_app: &App, model: &mut Model, _update: Update) {
    // One simulation tick per frame; the renderer is the sink here, so
    // the returned record batch is dropped
    let _ = model.sim.step();
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();

    // Clear the background
    draw.background().color(WHITE);

    // Simulation coordinates have the origin at the top-left with y down;
    // nannou frames are centered with y up
    let (width, height) = model.sim.area();
    for boid in model.sim.boids() {
        let x = boid.position.x - width / 2.0;
        let y = height / 2.0 - boid.position.y;
        draw.ellipse()
            .x_y(x, y)
            .radius(MARKER_RADIUS)
            .color(BLACK);
    }

    draw.to_frame(app, &frame).unwrap();
}
