use cosmogenesis_lib::model::config::UniverseConfig;
use cosmogenesis_lib::model::events::{EventKind, EventMeta};
use cosmogenesis_lib::model::universe::Universe;

/// Builds universes for integration tests.
///
/// Starts from the classic Conway configuration so each test opts into the
/// features it exercises.
#[allow(dead_code)]
pub struct UniverseBuilder {
    config: UniverseConfig,
    cells: Option<Vec<(usize, usize)>>,
    triggers: Vec<(EventKind, Option<EventMeta>)>,
}

#[allow(dead_code)]
impl UniverseBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            config: UniverseConfig::classic(rows, cols),
            cells: None,
            triggers: Vec::new(),
        }
    }

    /// Full default feature set on the given grid.
    pub fn cosmic(rows: usize, cols: usize) -> Self {
        let mut config = UniverseConfig::default();
        config.world.rows = rows;
        config.world.cols = cols;
        Self {
            config,
            cells: None,
            triggers: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut UniverseConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_cells(mut self, cells: &[(usize, usize)]) -> Self {
        self.cells
            .get_or_insert_with(Vec::new)
            .extend_from_slice(cells);
        self
    }

    /// Fills the rectangle `rows × cols` with its top-left corner at `(top, left)`.
    pub fn with_block(mut self, top: usize, left: usize, rows: usize, cols: usize) -> Self {
        let block: Vec<(usize, usize)> = (top..top + rows)
            .flat_map(|r| (left..left + cols).map(move |c| (r, c)))
            .collect();
        self.cells.get_or_insert_with(Vec::new).extend(block);
        self
    }

    pub fn with_trigger(mut self, kind: EventKind, meta: Option<EventMeta>) -> Self {
        self.triggers.push((kind, meta));
        self
    }

    pub fn build(self) -> Universe {
        let mut universe = match self.cells {
            Some(cells) => Universe::from_cells(self.config, &cells),
            None => Universe::new(self.config),
        }
        .expect("Failed to create universe in test builder");
        for (kind, meta) in self.triggers {
            universe
                .trigger_event(kind, meta)
                .expect("Failed to queue trigger in test builder");
        }
        universe
    }
}

/// Indices of live cells, for comparing shapes.
#[allow(dead_code)]
pub fn live_cells(universe: &Universe) -> Vec<(usize, usize)> {
    let topology = universe.topology();
    universe
        .life()
        .iter()
        .enumerate()
        .filter(|(_, &alive)| alive == 1)
        .map(|(idx, _)| topology.coords(idx))
        .collect()
}
