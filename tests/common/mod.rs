#![allow(dead_code)]
//! Builds netcdf v3 files in memory for the tests

const NC_DIMENSION: u32 = 10;
const NC_VARIABLE: u32 = 11;
const NC_ATTRIBUTE: u32 = 12;

/// Typed elements of an attribute or of a variable
#[derive(Debug, Clone)]
pub enum Payload {
    Byte(Vec<i8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Payload {
    pub fn text(s: &str) -> Self {
        Self::Char(s.as_bytes().to_vec())
    }

    /// Text padded with nulls to `len` characters
    pub fn padded(s: &str, len: usize) -> Self {
        let mut bytes = s.as_bytes().to_vec();
        bytes.resize(len, 0);
        Self::Char(bytes)
    }

    fn code(&self) -> u32 {
        match self {
            Self::Byte(_) => 1,
            Self::Char(_) => 2,
            Self::Short(_) => 3,
            Self::Int(_) => 4,
            Self::Float(_) => 5,
            Self::Double(_) => 6,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Byte(x) => x.len(),
            Self::Char(x) => x.len(),
            Self::Short(x) => x.len(),
            Self::Int(x) => x.len(),
            Self::Float(x) => x.len(),
            Self::Double(x) => x.len(),
        }
    }

    fn bytes(&self) -> Vec<u8> {
        match self {
            Self::Byte(x) => x.iter().map(|&b| b as u8).collect(),
            Self::Char(x) => x.clone(),
            Self::Short(x) => x.iter().flat_map(|v| v.to_be_bytes()).collect(),
            Self::Int(x) => x.iter().flat_map(|v| v.to_be_bytes()).collect(),
            Self::Float(x) => x.iter().flat_map(|v| v.to_be_bytes()).collect(),
            Self::Double(x) => x.iter().flat_map(|v| v.to_be_bytes()).collect(),
        }
    }
}

fn padded_len(n: usize) -> usize {
    (n + 3) / 4 * 4
}

struct VarDef {
    name: String,
    dims: Vec<u32>,
    attributes: Vec<(String, Payload)>,
    code: u32,
    /// A single entry for non-record variables, one per record otherwise
    data: Vec<Payload>,
    record: bool,
}

impl VarDef {
    fn vsize(&self) -> usize {
        padded_len(self.data.first().map_or(0, |p| p.bytes().len()))
    }
}

/// Lays out a file: header, then non-record data, then the records
pub struct Builder {
    version: u8,
    numrecs: u32,
    dims: Vec<(String, u32)>,
    attributes: Vec<(String, Payload)>,
    vars: Vec<VarDef>,
    data_start: usize,
    high_word: u32,
}

impl Builder {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            numrecs: 0,
            dims: vec![],
            attributes: vec![],
            vars: vec![],
            data_start: 0,
            high_word: 0,
        }
    }

    pub fn numrecs(mut self, numrecs: u32) -> Self {
        self.numrecs = numrecs;
        self
    }

    pub fn dimension(mut self, name: &str, len: u32) -> Self {
        self.dims.push((name.into(), len));
        self
    }

    pub fn attribute(mut self, name: &str, value: Payload) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    pub fn variable(mut self, name: &str, dims: &[u32], data: Payload) -> Self {
        self.vars.push(VarDef {
            name: name.into(),
            dims: dims.to_vec(),
            attributes: vec![],
            code: data.code(),
            data: vec![data],
            record: false,
        });
        self
    }

    /// The first dimension must be the unlimited one
    pub fn record_variable(mut self, name: &str, dims: &[u32], records: Vec<Payload>) -> Self {
        self.vars.push(VarDef {
            name: name.into(),
            dims: dims.to_vec(),
            attributes: vec![],
            code: records[0].code(),
            data: records,
            record: true,
        });
        self
    }

    /// Attribute of the last added variable
    pub fn variable_attribute(mut self, name: &str, value: Payload) -> Self {
        self.vars
            .last_mut()
            .unwrap()
            .attributes
            .push((name.into(), value));
        self
    }

    /// Position of the first byte of data, the space after
    /// the header is filled with zeros
    pub fn data_start(mut self, start: usize) -> Self {
        self.data_start = start;
        self
    }

    /// High word written before each offset of a 64-bit offset file
    pub fn high_word(mut self, high_word: u32) -> Self {
        self.high_word = high_word;
        self
    }

    fn header(&self, offsets: &[usize]) -> Vec<u8> {
        let mut buf = b"CDF".to_vec();
        buf.push(self.version);
        put_u32(&mut buf, self.numrecs);

        if self.dims.is_empty() {
            put_u32(&mut buf, 0);
            put_u32(&mut buf, 0);
        } else {
            put_u32(&mut buf, NC_DIMENSION);
            put_u32(&mut buf, self.dims.len() as u32);
            for (name, len) in &self.dims {
                put_name(&mut buf, name);
                put_u32(&mut buf, *len);
            }
        }

        put_attributes(&mut buf, &self.attributes);

        if self.vars.is_empty() {
            put_u32(&mut buf, 0);
            put_u32(&mut buf, 0);
        } else {
            put_u32(&mut buf, NC_VARIABLE);
            put_u32(&mut buf, self.vars.len() as u32);
            for (var, &offset) in self.vars.iter().zip(offsets) {
                put_name(&mut buf, &var.name);
                put_u32(&mut buf, var.dims.len() as u32);
                for &dim in &var.dims {
                    put_u32(&mut buf, dim);
                }
                put_attributes(&mut buf, &var.attributes);
                put_u32(&mut buf, var.code);
                put_u32(&mut buf, var.vsize() as u32);
                if self.version == 2 {
                    put_u32(&mut buf, self.high_word);
                }
                put_u32(&mut buf, offset as u32);
            }
        }
        buf
    }

    pub fn build(self) -> Vec<u8> {
        let header_len = self.header(&vec![0; self.vars.len()]).len();
        let begin = padded_len(header_len.max(self.data_start));

        let mut offsets = vec![0; self.vars.len()];
        let mut pos = begin;
        for (var, offset) in self.vars.iter().zip(&mut offsets) {
            if !var.record {
                *offset = pos;
                pos += var.vsize();
            }
        }
        let record_begin = pos;
        for (var, offset) in self.vars.iter().zip(&mut offsets) {
            if var.record {
                *offset = pos;
                pos += var.vsize();
            }
        }
        let record_step = pos - record_begin;

        let mut buf = self.header(&offsets);
        buf.resize(begin, 0);
        for var in self.vars.iter().filter(|v| !v.record) {
            put_data(&mut buf, &var.data[0], var.vsize());
        }
        for rec in 0..self.numrecs as usize {
            for var in self.vars.iter().filter(|v| v.record) {
                put_data(&mut buf, &var.data[rec], var.vsize());
            }
        }
        assert_eq!(
            buf.len(),
            record_begin + record_step * self.numrecs as usize
        );
        buf
    }
}

fn put_u32(buf: &mut Vec<u8>, x: u32) {
    buf.extend_from_slice(&x.to_be_bytes());
}

fn pad(buf: &mut Vec<u8>) {
    buf.resize(padded_len(buf.len()), 0);
}

fn put_name(buf: &mut Vec<u8>, name: &str) {
    put_u32(buf, name.len() as u32);
    buf.extend_from_slice(name.as_bytes());
    pad(buf);
}

fn put_attributes(buf: &mut Vec<u8>, attributes: &[(String, Payload)]) {
    if attributes.is_empty() {
        put_u32(buf, 0);
        put_u32(buf, 0);
        return;
    }
    put_u32(buf, NC_ATTRIBUTE);
    put_u32(buf, attributes.len() as u32);
    for (name, value) in attributes {
        put_name(buf, name);
        put_u32(buf, value.code());
        put_u32(buf, value.len() as u32);
        buf.extend_from_slice(&value.bytes());
        pad(buf);
    }
}

fn put_data(buf: &mut Vec<u8>, data: &Payload, vsize: usize) {
    let start = buf.len();
    buf.extend_from_slice(&data.bytes());
    buf.resize(start + vsize, 0);
}

/// Number of records in the surface observation file
pub const MADIS_RECORDS: usize = 178;
/// Offset of the first variable of the surface observation file
pub const MADIS_DATA_START: usize = 39208;

/// Station identifiers at the start of `staticIds`
pub const STATIC_IDS: [&str; 20] = [
    "WAAA", "WAAB", "WAAC", "WABA", "WABB", "WABC", "WBAA", "WBAB", "WBGA", "WBGB", "WBGC",
    "WBHA", "WBHB", "WBHC", "WCIA", "WCJA", "WCKA", "WCLA", "WCTA", "WCUA",
];

pub fn madis_latitude(rec: usize) -> f32 {
    40.0 + rec as f32 * 0.25
}

pub fn madis_station(rec: usize) -> String {
    format!("STATION {rec}")
}

/// A file laid out like a MADIS surface observation file
///
/// Dimension 21 (`recNum`) is unlimited with 178 records of 1220 bytes.
/// The first variable `nStaticIds` is stored at byte 39208.
pub fn madis() -> Vec<u8> {
    let dims = [
        ("maxAutoStaLen", 6),
        ("maxAutoWeaLen", 12),
        ("maxRepLen", 5),
        ("maxSkyCover", 6),
        ("maxSkyLen", 8),
        ("maxStaNamLen", 51),
        ("maxStaticIds", 350),
        ("maxWeatherLen", 25),
        ("nInventoryBins", 24),
        ("namelen", 4),
        ("maxRawLen", 1092),
        ("QCcheckNum", 10),
        ("QCcheckNameLen", 60),
        ("ICcheckNum", 55),
        ("ICcheckNameLen", 72),
        ("nPrecipTypes", 2),
        ("totalIdLen", 6),
        ("maxMETARLen", 256),
        ("maxSAOLen", 256),
        ("maxAutoObs", 4),
        ("nTimes", 24),
        ("recNum", 0),
    ];
    let mut builder = Builder::new(1).numrecs(MADIS_RECORDS as u32);
    for (name, len) in dims {
        builder = builder.dimension(name, len);
    }

    let mut static_ids = vec![0_u8; 350 * 6];
    for (row, id) in STATIC_IDS.iter().enumerate() {
        static_ids[row * 6..row * 6 + id.len()].copy_from_slice(id.as_bytes());
    }

    let records = |f: &dyn Fn(usize) -> Payload| (0..MADIS_RECORDS).map(f).collect::<Vec<_>>();

    builder
        .attribute("cdlDate", Payload::text("20160101"))
        .attribute("idVariables", Payload::text("stationName"))
        .attribute("timeVariables", Payload::text("timeObs"))
        .attribute("filePeriod", Payload::Int(vec![3600]))
        .attribute("Conventions", Payload::text("MADIS surface observations, v1.0"))
        .data_start(MADIS_DATA_START)
        .variable("nStaticIds", &[], Payload::Int(vec![145]))
        .variable("staticIds", &[6, 16], Payload::Char(static_ids))
        .variable_attribute("long_name", Payload::text("station identifiers"))
        .variable("lastRecord", &[6], Payload::Int((0..350).map(|i| i - 1).collect()))
        .record_variable(
            "latitude",
            &[21],
            records(&|i| Payload::Float(vec![madis_latitude(i)])),
        )
        .variable_attribute("units", Payload::text("degree_N"))
        .record_variable(
            "longitude",
            &[21],
            records(&|i| Payload::Float(vec![-100.0 - i as f32 * 0.5])),
        )
        .record_variable(
            "elevation",
            &[21],
            records(&|i| Payload::Float(vec![i as f32 * 10.0])),
        )
        .record_variable(
            "timeObs",
            &[21],
            records(&|i| Payload::Double(vec![1.45e9 + i as f64 * 60.0])),
        )
        .variable_attribute("units", Payload::text("seconds since 1970-1-1 00:00:00.0"))
        .record_variable(
            "stationName",
            &[21, 5],
            records(&|i| Payload::padded(&madis_station(i), 51)),
        )
        .record_variable(
            "temperature",
            &[21],
            records(&|i| Payload::Float(vec![280.0 + (i % 10) as f32])),
        )
        .variable_attribute("units", Payload::text("kelvin"))
        .variable_attribute("valid_range", Payload::Float(vec![180.0, 330.0]))
        .record_variable(
            "dewpoint",
            &[21],
            records(&|i| Payload::Float(vec![270.0 + (i % 5) as f32])),
        )
        .record_variable(
            "skyCover",
            &[21, 3, 4],
            records(&|_| Payload::padded("CLR", 48)),
        )
        .record_variable(
            "rawMessage",
            &[21, 10],
            records(&|i| Payload::padded(&format!("METAR K{i:03} 011200Z AUTO"), 1092)),
        )
        .build()
}

/// Drifter count of the drifter file
pub const DRIFTERS: usize = 1000;
/// Number of time steps of the drifter file
pub const DRIFTER_STEPS: usize = 20;

pub fn drifter_depth(step: usize, drifter: usize) -> f32 {
    -(1.0 + step as f32 * 0.1 + drifter as f32 * 0.001)
}

/// Particle tracking output with `lon`, `lat` and `depth` over
/// `(time, drifter)`, with `time` unlimited
pub fn ichthyop() -> Vec<u8> {
    let field = |f: fn(usize, usize) -> f32| {
        (0..DRIFTER_STEPS)
            .map(|t| Payload::Float((0..DRIFTERS).map(|d| f(t, d)).collect()))
            .collect::<Vec<_>>()
    };
    Builder::new(1)
        .numrecs(DRIFTER_STEPS as u32)
        .dimension("time", 0)
        .dimension("drifter", DRIFTERS as u32)
        .attribute("transport_dimension", Payload::text("3d"))
        .record_variable(
            "time",
            &[0],
            (0..DRIFTER_STEPS)
                .map(|t| Payload::Double(vec![t as f64 * 3600.0]))
                .collect(),
        )
        .record_variable("lon", &[0, 1], field(|t, d| t as f32 + d as f32 * 0.01))
        .record_variable("lat", &[0, 1], field(|t, d| -(t as f32) - d as f32 * 0.01))
        .record_variable("depth", &[0, 1], field(drifter_depth))
        .variable_attribute("units", Payload::text("meter"))
        .build()
}

/// A 64-bit offset file with a short and a byte variable
pub fn offset64(high_word: u32) -> Vec<u8> {
    Builder::new(2)
        .high_word(high_word)
        .dimension("x", 3)
        .attribute("title", Payload::text("offsets"))
        .variable("small", &[0], Payload::Short(vec![-1, 0, 1]))
        .variable("tiny", &[0], Payload::Byte(vec![-128, 0, 127]))
        .build()
}

/// A classic file whose only attribute has type code 7
pub fn invalid_type() -> Vec<u8> {
    let mut buf = b"CDF\x01".to_vec();
    put_u32(&mut buf, 0);
    put_u32(&mut buf, 0);
    put_u32(&mut buf, 0);
    put_u32(&mut buf, NC_ATTRIBUTE);
    put_u32(&mut buf, 1);
    put_name(&mut buf, "long");
    put_u32(&mut buf, 7);
    put_u32(&mut buf, 1);
    buf.extend_from_slice(&[0; 8]);
    put_u32(&mut buf, 0);
    put_u32(&mut buf, 0);
    buf
}
