//! egui overlay: body names, status bar and the body info panel

use common::ScreenTransform;
use egui::{Align2, Color32, Context, FontId, Id, LayerId, Order, RichText};
use solar_system::constants::{AU, SECONDS_PER_DAY};
use solar_system::{Body, Simulation, SimulationError, UpdateOrder};

const LABEL_COLOR: Color32 = Color32::from_rgb(40, 153, 34);
const LABEL_SIZE: f32 = 16.0;

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub const INTEGRATOR_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Newton's Law of Gravitation",
        formula: "F = G·m₁·m₂ / r²",
        description: "Pull of each other body, summed per step",
    },
    Equation {
        name: "Velocity Update",
        formula: "v ← v + (F / m)·Δt",
        description: "Applied first",
    },
    Equation {
        name: "Position Update",
        formula: "x ← x + v·Δt",
        description: "Uses the new velocity (semi-implicit Euler)",
    },
];

/// What the status bar reports besides the simulation itself
pub struct Status<'a> {
    pub paused: bool,
    pub halted: Option<&'a SimulationError>,
    pub show_trails: bool,
    pub pixels_per_au: f64,
}

/// Names of the non-anchor bodies, centered on the bodies
pub fn draw_body_labels(ctx: &Context, bodies: &[Body], transform: &ScreenTransform) {
    let painter = ctx.layer_painter(LayerId::new(Order::Background, Id::new("body_labels")));
    let pixels_per_point = ctx.pixels_per_point();

    for body in bodies.iter().filter(|b| !b.is_anchor) {
        let [x, y] = transform.to_screen(body.position);
        painter.text(
            egui::pos2(x / pixels_per_point, y / pixels_per_point),
            Align2::CENTER_CENTER,
            &body.name,
            FontId::monospace(LABEL_SIZE),
            LABEL_COLOR,
        );
    }
}

pub fn draw_status_bar(ctx: &Context, simulation: &Simulation, status: &Status) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Day {:.0}", simulation.elapsed_time() / SECONDS_PER_DAY));
            ui.separator();
            ui.label(format!("Bodies: {}", simulation.bodies().len()));
            ui.separator();
            ui.label(format!("Δt: {:.0} s", simulation.timestep()));
            ui.separator();
            ui.label(format!("Scale: {:.0} px/AU", status.pixels_per_au));
            if simulation.update_order() == UpdateOrder::Sequential {
                ui.separator();
                ui.label("Sequential");
            }
            ui.separator();
            if let Some(err) = status.halted {
                ui.label(RichText::new(format!("HALTED: {err}")).color(Color32::RED));
            } else if status.paused {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("RUNNING").color(Color32::GREEN));
            }
            if status.show_trails {
                ui.separator();
                ui.label("Trails ON");
            }
        });
    });
}

/// Side panel with each planet's distance to the anchor and the update rule
pub fn draw_body_panel(ctx: &Context, simulation: &Simulation) {
    egui::SidePanel::right("body_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Solar System").color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::Grid::new("body_grid")
                .num_columns(3)
                .spacing([10.0, 4.0])
                .striped(true)
                .show(ui, |ui| {
                    ui.label(RichText::new("Body").strong());
                    ui.label(RichText::new("To anchor").strong());
                    ui.label(RichText::new("Speed").strong());
                    ui.end_row();

                    for body in simulation.bodies() {
                        ui.label(RichText::new(&body.name).monospace());
                        if body.is_anchor {
                            ui.label("-");
                        } else {
                            ui.label(format!("{:.1} km", body.distance_to_anchor / 1000.0))
                                .on_hover_text(format!("{:.4} AU", body.distance_to_anchor / AU));
                        }
                        ui.label(format!("{:.2} km/s", body.velocity.length() / 1000.0));
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            ui.label(format!("Trail points: {}", simulation.trail_points()));
            ui.label(format!("Total energy: {:.4e} J", simulation.total_energy()));

            ui.add_space(8.0);
            ui.collapsing(RichText::new("Equations").strong(), |ui| {
                for eq in INTEGRATOR_EQUATIONS {
                    ui.group(|ui| {
                        ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                        ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                        ui.label(RichText::new(eq.description).small().italics());
                    });
                    ui.add_space(4.0);
                }
            });
        });
}
