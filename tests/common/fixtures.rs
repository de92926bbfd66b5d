//! Test fixtures and data factories
//!
//! Provides factory methods for creating CSV uploads with sensible
//! defaults, plus a multipart body builder for HTTP tests.

/// Factory for CSV upload contents
pub struct CsvFactory;

impl CsvFactory {
    /// A valid CSV with `count` hospitals
    pub fn valid(count: usize) -> Vec<u8> {
        let mut csv = String::from("name,address,phone\n");
        for i in 1..=count {
            csv.push_str(&format!("Hospital {},{} Main St,555-{:04}\n", i, i, i));
        }
        csv.into_bytes()
    }

    /// Row 1 valid, row 2 with an empty address
    pub fn with_invalid_address_row() -> Vec<u8> {
        b"name,address,phone\nA,1 Main St,555-1\nB,,555-2\n".to_vec()
    }

    /// Header missing the required address column
    pub fn missing_address_column() -> Vec<u8> {
        b"name,phone\nGeneral Hospital,555-0100\n".to_vec()
    }
}

/// Build a multipart/form-data body carrying one CSV file field
///
/// Returns the content-type header value and the raw body.
pub fn multipart_csv(filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "csv-upload-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_factory_row_count() {
        let csv = String::from_utf8(CsvFactory::valid(3)).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.starts_with("name,address,phone\n"));
    }

    #[test]
    fn test_multipart_body_contains_file() {
        let (content_type, body) = multipart_csv("hospitals.csv", b"name,address\nA,1 St\n");
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("filename=\"hospitals.csv\""));
        assert!(body.contains("name,address"));
    }
}
