use anyhow::Result;
use console_engine::{ConsoleEngine, KeyCode};

use crate::environment::road::console_drawer::ConsoleDrawer;
use crate::environment::road_environment::RoadEnvironment;
use crate::ql::prelude::{DebugVisualizer, Environment, Presenter};

pub const DEFAULT_COLUMNS: u32 = 100;
pub const DEFAULT_ROWS: u32 = 37;
/// sensor gauges + status line
const PANEL_ROWS: u32 = 7;

/// Terminal front-end for the road: draws the track with the car and the sensor gauges.
///
/// Pacing is done by the engine's frame clock; `q` or `Esc` requests a stop.
pub struct ConsolePresenter {
    engine: ConsoleEngine,
    drawer: ConsoleDrawer,
    stop: bool,
    frame: u64,
}

impl ConsolePresenter {
    pub fn new(ticks_per_second: u32) -> Result<Self> {
        Self::with_size(DEFAULT_COLUMNS, DEFAULT_ROWS, ticks_per_second)
    }

    pub fn with_size(
        columns: u32,
        rows: u32,
        ticks_per_second: u32,
    ) -> Result<Self> {
        let engine = ConsoleEngine::init(columns, rows + PANEL_ROWS, ticks_per_second)?;
        Ok(Self {
            engine,
            drawer: ConsoleDrawer::new(columns, rows),
            stop: false,
            frame: 0,
        })
    }
}

impl Presenter<RoadEnvironment> for ConsolePresenter {
    fn present(
        &mut self,
        environment: &RoadEnvironment,
    ) -> Result<()> {
        let road = self.drawer.draw(environment.field(), environment.car());
        let gauges = environment.state().render_to_console();
        let road_rows = road.get_height() as i32;

        self.engine.clear_screen();
        self.engine.print_screen(0, 0, &road);
        self.engine.print_screen(0, road_rows + 1, &gauges);
        self.engine.print(
            0,
            road_rows + gauges.get_height() as i32 + 1,
            &format!("frame {} | heading {:.0}° | q: quit", self.frame, environment.car().heading()),
        );
        self.engine.draw();
        self.frame += 1;
        Ok(())
    }

    fn wait_tick(&mut self) {
        self.engine.wait_frame();
        if self.engine.is_key_pressed(KeyCode::Char('q')) || self.engine.is_key_pressed(KeyCode::Esc) {
            self.stop = true;
        }
    }

    fn stop_requested(&mut self) -> bool { self.stop }
}
