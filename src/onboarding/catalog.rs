use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InstructionLevel {
    pub category: &'static str,
    /// Empty when the level has no sub-options
    pub options: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct Region {
    pub name: &'static str,
    pub provinces: &'static [&'static str],
}

pub const INSTRUCTION_LEVELS: &[InstructionLevel] = &[
    InstructionLevel {
        category: "Escolar",
        options: &["5to de secundaria", "4to de secundaria", "3ero de secundaria"],
    },
    InstructionLevel { category: "Pre-universitario", options: &[] },
    InstructionLevel { category: "Universitario", options: &[] },
    InstructionLevel { category: "Trabajador", options: &[] },
];

pub const REGIONS: &[Region] = &[
    Region { name: "Lima", provinces: &["Lima", "Barranca", "Cañete", "Huaral", "Huaura"] },
    Region { name: "Arequipa", provinces: &["Arequipa", "Camaná", "Caravelí", "Castilla", "Caylloma"] },
    Region { name: "Cusco", provinces: &["Cusco", "Acomayo", "Anta", "Calca", "Canas"] },
    Region { name: "La Libertad", provinces: &["Trujillo", "Ascope", "Bolívar", "Chepén", "Gran Chimú"] },
    Region { name: "Piura", provinces: &["Piura", "Ayabaca", "Huancabamba", "Morropón", "Paita"] },
];

pub fn instruction_level(category: &str) -> Option<&'static InstructionLevel> {
    INSTRUCTION_LEVELS.iter().find(|level| level.category == category)
}

pub fn region(name: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|region| region.name == name)
}

impl InstructionLevel {
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

impl Region {
    pub fn contains(&self, province: &str) -> bool {
        self.provinces.contains(&province)
    }
}
