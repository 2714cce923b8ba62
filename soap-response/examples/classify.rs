//! Classify a few canned SOAP responses and print what was found
//!
//! Run with `SOAP_LOG_MODE=development` to see the library's log output.

use soap_response::logging::init_logging_from_env;
use soap_response::{ErrorPolicy, HttpResponse, Outcome, Response, SoapError};

const SOAP_11_FAULT: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
    <soap:Body>
        <soap:Fault>
            <faultcode>soap:Client</faultcode>
            <faultstring>Invalid account</faultstring>
            <detail><errorcode>1001</errorcode></detail>
        </soap:Fault>
    </soap:Body>
</soap:Envelope>"#;

const SOAP_12_FAULT: &str = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
    <env:Body>
        <env:Fault>
            <env:Code><env:Value>env:Receiver</env:Value></env:Code>
            <env:Reason><env:Text xml:lang="en">Backend offline</env:Text></env:Reason>
        </env:Fault>
    </env:Body>
</env:Envelope>"#;

const SUCCESS: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
    <soap:Body><GetQuoteResponse><Price>101.25</Price></GetQuoteResponse></soap:Body>
</soap:Envelope>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let samples = vec![
        ("success", HttpResponse::new(200, "OK", SUCCESS)),
        ("soap 1.1 fault", HttpResponse::new(500, "Internal Server Error", SOAP_11_FAULT)),
        ("soap 1.2 fault", HttpResponse::new(200, "OK", SOAP_12_FAULT)),
        ("http error", HttpResponse::new(503, "Service Unavailable", "try again later")),
        ("not xml", HttpResponse::new(200, "OK", "<html>oops")),
    ];

    println!("== lenient policy");
    let lenient = ErrorPolicy::lenient();
    for (name, http) in &samples {
        let response = Response::with_policy(http.clone(), &lenient)?;
        match response.outcome() {
            Outcome::Success => println!("{name}: success, body = {}", response.body()),
            Outcome::SoapFault(fault) => {
                println!("{name}: SOAP fault {} (code {})", fault.message(), fault.code())
            }
            Outcome::HttpError(error) => println!("{name}: HTTP error {}", error.message()),
        }
    }

    println!("== strict policy");
    let strict = ErrorPolicy::new();
    for (name, http) in samples {
        match Response::with_policy(http, &strict) {
            Ok(_) => println!("{name}: ok"),
            Err(SoapError::Fault(fault)) => println!("{name}: raised fault: {fault}"),
            Err(SoapError::Http(error)) => println!("{name}: raised HTTP error: {error}"),
            Err(other) => return Err(other.into()),
        }
    }

    Ok(())
}
