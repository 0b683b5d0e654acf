use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One sales record; `None` fields become missing cells.
#[derive(Clone)]
struct Sale {
    order_id: u32,
    region: &'static str,
    product: &'static str,
    units: Option<i64>,
    unit_price: Option<f64>,
}

const HEADERS: [&str; 5] = ["order_id", "region", "product", "units", "unit_price"];

fn generate(rng: &mut SimpleRng, n: u32) -> Vec<Sale> {
    let regions = ["North", "South", "East", "West"];
    let products = [("Widget", 2.5), ("Gadget", 12.0), ("Doohickey", 7.25)];

    let mut sales = Vec::new();
    for order_id in 1..=n {
        let (product, base_price) = *rng.pick(&products);
        let units = (rng.next_f64() > 0.1).then(|| 1 + (rng.next_f64() * 40.0) as i64);
        let unit_price = (rng.next_f64() > 0.1)
            .then(|| (base_price * (0.9 + rng.next_f64() * 0.2) * 100.0).round() / 100.0);
        let sale = Sale {
            order_id,
            region: *rng.pick(&regions),
            product,
            units,
            unit_price,
        };
        // Roughly one in eight orders was entered twice.
        if rng.next_f64() < 0.125 {
            sales.push(sale.clone());
        }
        sales.push(sale);
    }
    sales
}

fn write_csv(path: &str, sales: &[Sale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for s in sales {
        writer.write_record([
            s.order_id.to_string(),
            s.region.to_string(),
            s.product.to_string(),
            s.units.map(|u| u.to_string()).unwrap_or_default(),
            s.unit_price.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &str, sales: &[Sale]) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }
    for (i, s) in sales.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, s.order_id)?;
        sheet.write_string(row, 1, s.region)?;
        sheet.write_string(row, 2, s.product)?;
        if let Some(units) = s.units {
            sheet.write_number(row, 3, units as f64)?;
        }
        if let Some(price) = s.unit_price {
            sheet.write_number(row, 4, price)?;
        }
    }

    workbook.save(path).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let sales = generate(&mut rng, 200);

    write_csv("sample_sales.csv", &sales)?;
    write_xlsx("sample_sales.xlsx", &sales)?;

    let missing = sales
        .iter()
        .filter(|s| s.units.is_none() || s.unit_price.is_none())
        .count();
    println!(
        "Wrote {} rows ({} with missing values) to sample_sales.csv and sample_sales.xlsx",
        sales.len(),
        missing
    );
    Ok(())
}
