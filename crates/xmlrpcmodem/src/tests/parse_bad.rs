use crate::{
    CallError, ResponseError, ResponseParser, parse_method_call, parse_method_response,
};

const HTML_PAGE: &str = "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\
    <!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \
    \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\
    <html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">\
    <head><title>401 - Unauthorized</title></head>\
    <body><h1>401 - Unauthorized</h1></body></html>";

const BROKEN_HTML_PAGE: &str = "<html xmlns=\"http://www.w3.org/1999/xhtml\">\
    <head><title>401 - Unauthorized</title></head>\
    <body><h1>401 - Unauthorized</h1><br></body></html>";

#[test]
fn response_fault() {
    let error = parse_method_response(
        "<methodResponse><fault><value><struct>\
         <member><name>faultCode</name><value><int>4</int></value></member>\
         <member><name>faultString</name><value><string>Too many parameters.</string></value></member>\
         </struct></value></fault></methodResponse>",
    )
    .unwrap_err();
    assert_eq!(
        error,
        ResponseError::Fault {
            fault_code: 4,
            fault_string: "Too many parameters.".to_owned(),
        }
    );
    assert_eq!(error.to_string(), "Too many parameters.");
}

#[test]
fn response_with_an_empty_fault() {
    let error = parse_method_response(
        "<?xml version=\"1.0\"?><methodResponse><fault><value/></fault></methodResponse>",
    )
    .unwrap_err();
    assert_eq!(error, ResponseError::InvalidResponse);
    assert_eq!(error.to_string(), "Invalid method response.");
}

#[test]
fn response_fault_missing_code_or_string() {
    for body in [
        "<value><struct><member><name>faultCode</name>\
         <value><int>4</int></value></member></struct></value>",
        "<value><struct><member><name>faultString</name>\
         <value><string>oops</string></value></member></struct></value>",
        "<value><string>oops</string></value>",
    ] {
        let xml = format!("<methodResponse><fault>{body}</fault></methodResponse>");
        assert_eq!(
            parse_method_response(&xml),
            Err(ResponseError::InvalidResponse),
            "{body}"
        );
    }
}

#[test]
fn response_valid_xml_but_not_xmlrpc() {
    let error = parse_method_response(HTML_PAGE).unwrap_err();
    assert_eq!(error, ResponseError::InvalidResponse);
    assert_eq!(error.to_string(), "Invalid method response.");
}

#[test]
fn response_invalid_xml() {
    let error = parse_method_response(BROKEN_HTML_PAGE).unwrap_err();
    assert_eq!(error.to_string(), "Invalid method response.");
}

#[test]
fn call_valid_xml_but_not_xmlrpc() {
    let error = parse_method_call(HTML_PAGE).unwrap_err();
    assert_eq!(error, CallError);
    assert_eq!(error.to_string(), "Invalid method call.");
}

#[test]
fn call_invalid_xml() {
    let error = parse_method_call(BROKEN_HTML_PAGE).unwrap_err();
    assert_eq!(error.to_string(), "Invalid method call.");
}

#[test]
fn response_with_more_than_one_param() {
    assert_eq!(
        parse_method_response(
            "<methodResponse><params>\
             <param><value><int>1</int></value></param>\
             <param><value><int>2</int></value></param>\
             </params></methodResponse>",
        ),
        Err(ResponseError::InvalidResponse)
    );
}

#[test]
fn response_with_no_params() {
    assert_eq!(
        parse_method_response("<methodResponse><params></params></methodResponse>"),
        Err(ResponseError::InvalidResponse)
    );
}

#[test]
fn response_truncated_mid_document() {
    assert_eq!(
        parse_method_response("<methodResponse><params><param><value><int>1</int>"),
        Err(ResponseError::InvalidResponse)
    );
}

#[test]
fn response_with_a_boolean_that_is_not_zero_or_one() {
    assert_eq!(
        parse_method_response(
            "<methodResponse><params><param>\
             <value><boolean>2</boolean></value>\
             </param></params></methodResponse>",
        ),
        Err(ResponseError::InvalidResponse)
    );
}

#[test]
fn response_with_a_malformed_datetime() {
    assert_eq!(
        parse_method_response(
            "<methodResponse><params><param>\
             <value><dateTime.iso8601>2012-06-08T11:35:10</dateTime.iso8601></value>\
             </param></params></methodResponse>",
        ),
        Err(ResponseError::InvalidResponse)
    );
}

#[test]
fn call_missing_method_name() {
    assert_eq!(
        parse_method_call(
            "<methodCall><params>\
             <param><value><int>1</int></value></param>\
             </params></methodCall>",
        ),
        Err(CallError)
    );
}

#[test]
fn call_with_an_empty_method_name() {
    assert_eq!(
        parse_method_call(
            "<methodCall><methodName>  </methodName><params>\
             <param><value><int>1</int></value></param>\
             </params></methodCall>",
        ),
        Err(CallError)
    );
}

#[test]
fn call_missing_params() {
    assert_eq!(
        parse_method_call("<methodCall><methodName>ping</methodName></methodCall>"),
        Err(CallError)
    );
}

#[test]
fn call_with_a_fault_element() {
    assert_eq!(
        parse_method_call(
            "<methodCall><fault><value><string>nope</string></value></fault></methodCall>",
        ),
        Err(CallError)
    );
}

#[test]
fn wrong_root_for_the_operation() {
    assert_eq!(
        parse_method_response(
            "<methodCall><methodName>ping</methodName>\
             <params></params></methodCall>",
        ),
        Err(ResponseError::InvalidResponse)
    );
    assert!(
        parse_method_call(
            "<methodResponse><params><param>\
             <value><int>1</int></value>\
             </param></params></methodResponse>",
        )
        .is_err()
    );
}

#[test]
fn trailing_markup_after_the_root_is_rejected() {
    assert_eq!(
        parse_method_response(
            "<methodResponse><params><param><value><int>1</int></value>\
             </param></params></methodResponse><methodResponse/>",
        ),
        Err(ResponseError::InvalidResponse)
    );
}

#[test]
fn failure_latches_across_feeds() {
    let mut parser = ResponseParser::new();
    parser.feed("<nope>");
    parser.feed(
        "<methodResponse><params><param><value><int>1</int></value>\
         </param></params></methodResponse>",
    );
    assert_eq!(parser.close(), Err(ResponseError::InvalidResponse));
}

#[test]
fn empty_input_is_rejected() {
    assert_eq!(parse_method_response(""), Err(ResponseError::InvalidResponse));
    assert_eq!(parse_method_call(""), Err(CallError));
}

#[test]
fn array_value_without_a_data_element() {
    assert_eq!(
        parse_method_response(
            "<methodResponse><params><param>\
             <value><array><value><int>1</int></value></array></value>\
             </param></params></methodResponse>",
        ),
        Err(ResponseError::InvalidResponse)
    );
}

#[test]
fn mismatched_scalar_close_tag() {
    assert_eq!(
        parse_method_response(
            "<methodResponse><params><param>\
             <value><int>1</i4></value>\
             </param></params></methodResponse>",
        ),
        Err(ResponseError::InvalidResponse)
    );
}
